//! rule condition trees used by governance rules
//!
//! a rule's `required_config` is a two-level tree:
//! - the top level is a single property, or an `and`/`or` of conditions
//! - each condition is a single property, or an `and`/`or` of single properties
//!
//! both levels serialize through the decoder in [`parser`], so any model that
//! embeds a tree gets the same dispatch and the same error paths.

mod parser;
mod types;

pub use parser::{
    decode_condition, decode_required_config, decode_single_property, encode_condition,
    encode_required_config, encode_single_property, DecodeError,
};
pub use types::{Operator, RuleCondition, RuleRequiredConfig, SingleProperty};
