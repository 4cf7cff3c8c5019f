pub mod formatter;
pub mod report;

pub use formatter::{
    format_grade_detail, format_grade_point, format_grade_table, format_percentage, format_scale,
    format_tsv, should_use_colors, GradedStudent,
};
pub use report::{render_report, write_report, GradeReport};
