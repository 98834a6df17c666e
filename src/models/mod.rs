mod homework;
mod verdict;

pub use homework::HomeworkRecord;
pub use verdict::Verdict;
