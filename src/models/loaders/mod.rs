pub mod exam_loader;

pub use exam_loader::{load_exam_file, resolve_exam_path, safe_file_stem};
