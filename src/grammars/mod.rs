//! Built-in grammars. Each module pairs a [`Grammar`](crate::Grammar) with a
//! [`RuleSet`](crate::RuleSet) and exposes a small entry point on top.

pub mod damage;
pub mod moderation;
pub mod search;
