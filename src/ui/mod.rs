pub mod list;
pub mod mvi;
