//! Grammar productions, split by syntactic category.

mod class;
mod expr;
mod func;
mod pattern;
mod stmt;
