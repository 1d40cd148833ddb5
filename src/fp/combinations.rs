/// Call `callback` with every ascending index combination of size `1..=max_k`
/// drawn from `0..n`, smaller sizes first.
///
/// Stops at the first error the callback returns.
pub fn for_each_combination<E, F>(n: usize, max_k: usize, mut callback: F) -> Result<(), E>
where
    F: FnMut(&[usize]) -> Result<(), E>,
{
    let mut current = Vec::with_capacity(max_k.min(n));
    for k in 1..=max_k.min(n) {
        generate_combinations_recursive(n, k, 0, &mut current, &mut callback)?;
    }
    Ok(())
}

fn generate_combinations_recursive<E, F>(
    n: usize,
    k: usize,
    start: usize,
    current: &mut Vec<usize>,
    callback: &mut F,
) -> Result<(), E>
where
    F: FnMut(&[usize]) -> Result<(), E>,
{
    if current.len() == k {
        return callback(current);
    }

    // leave room for the positions still to fill
    let last_start = n - (k - current.len());
    for i in start..=last_start {
        current.push(i);
        generate_combinations_recursive(n, k, i + 1, current, callback)?;
        current.pop();
    }
    Ok(())
}
