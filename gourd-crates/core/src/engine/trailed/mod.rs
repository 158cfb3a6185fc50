mod trailed_bit_set;
mod trailed_integer;
mod trailed_values;

pub(crate) use trailed_bit_set::*;
pub use trailed_integer::*;
pub use trailed_values::*;
