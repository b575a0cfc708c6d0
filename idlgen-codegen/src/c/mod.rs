//! C code generation modules.

pub mod comment;
pub mod declarations;
pub mod destructors;
pub mod stmt;

pub use comment::format_comment;
pub use declarations::DeclarationGenerator;
pub use destructors::DestructorGenerator;
pub use stmt::Stmt;
