// Route handlers, one module per resource.

pub mod compare;
pub mod condition;
