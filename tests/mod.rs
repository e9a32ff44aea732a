pub mod context;
pub mod failure;
pub mod macros;
pub mod validator;
