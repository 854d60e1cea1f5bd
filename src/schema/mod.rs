pub mod note;
pub mod options;
pub mod value;
