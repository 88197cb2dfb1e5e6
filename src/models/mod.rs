pub mod exam;
pub mod loaders;
pub mod submission;

pub use exam::{AnswerOption, Exam, Question};
pub use loaders::{load_exam_file, resolve_exam_path, safe_file_stem};
pub use submission::{SubmissionPayload, SubmittedAnswer, SubmittedQuestion};
