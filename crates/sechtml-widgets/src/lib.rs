//! HTML widgets rendered without inline event handlers or styles.

mod attributes;
mod button;

pub use attributes::{AttributeMap, data_value_to_string};
pub use button::{Button, ButtonConfig, HOOK_ID_ATTRIBUTE};
