mod antecedent;
mod rule;

pub use antecedent::Antecedent;
pub(crate) use rule::confidence;
pub use rule::Rule;
