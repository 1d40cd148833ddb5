use numpy::PyReadonlyArray2;
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::{EncodedDataset, MiningConfig, MiningJob, Preset};

/// `(antecedent, class, support_antecedent, support_class, support_rule)`
type RuleTuple = (Vec<usize>, usize, usize, usize, usize);

fn to_ids(values: impl IntoIterator<Item = i64>) -> PyResult<Vec<usize>> {
    values
        .into_iter()
        .map(|value| {
            usize::try_from(value)
                .map_err(|_| PyValueError::new_err(format!("negative id {value}")))
        })
        .collect()
}

#[pyfunction]
#[pyo3(signature = (items, labels, preset="cba", min_support=0.01, min_confidence=0.5, max_work=None))]
fn mine_rules<'py>(
    py: Python<'py>,
    items: PyReadonlyArray2<'py, i64>,
    labels: Vec<i64>,
    preset: &str,
    min_support: f64,
    min_confidence: f64,
    max_work: Option<usize>,
) -> PyResult<Vec<RuleTuple>> {
    let view = items.as_array();
    let shape = (view.nrows(), view.ncols());
    let flat = to_ids(view.iter().copied())?;
    let matrix = ndarray::Array2::from_shape_vec(shape, flat)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    let labels = to_ids(labels)?;

    let dataset = EncodedDataset::new(matrix, &labels)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    let preset: Preset = preset
        .parse()
        .map_err(|e: crate::ConfigError| PyValueError::new_err(e.to_string()))?;
    let mut config = MiningConfig::new(min_support, min_confidence);
    config.max_work = max_work;

    let job = MiningJob::from_preset(&dataset, preset, config);
    let rules = py
        .allow_threads(|| job.run())
        .map_err(|e| PyRuntimeError::new_err(e.to_string()))?;

    Ok(rules
        .into_iter()
        .map(|rule| {
            (
                rule.antecedent().items().to_vec(),
                rule.class(),
                rule.support_antecedent(),
                rule.support_class(),
                rule.support_rule(),
            )
        })
        .collect())
}

#[pymodule]
fn carmine(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(mine_rules, m)?)?;
    Ok(())
}
