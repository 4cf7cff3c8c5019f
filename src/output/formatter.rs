use owo_colors::OwoColorize;
use rust_decimal::Decimal;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::grading::{ComputedGrade, GradePointSource, GradeScale, RawTotals};

/// A student's name with their computed grade, for display
pub struct GradedStudent<'a> {
    pub name: &'a str,
    pub grade: &'a ComputedGrade,
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a grade point with two decimals ("1.75", "5.00")
pub fn format_grade_point(value: Decimal) -> String {
    format!("{:.2}", value)
}

/// Format a percentage with two decimals ("87.72")
pub fn format_percentage(value: Decimal) -> String {
    format!("{:.2}", value)
}

fn format_raw(raw: &RawTotals) -> String {
    format!("{}/{}", raw.score.normalize(), raw.total.normalize())
}

/// Marker shown after a grade point that did not come from the scale
fn source_marker(source: GradePointSource) -> &'static str {
    match source {
        GradePointSource::Scale | GradePointSource::FailingFloor => "",
        GradePointSource::UnmatchedFallback => "?",
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format graded students as a table with columns: Index, Final %, Rounded, Grade point, Name
/// No headers. Grade points that fell back because no scale entry matched get a trailing "?".
pub fn format_grade_table(students: &[GradedStudent], use_colors: bool) -> String {
    if students.is_empty() {
        return "No grades computed.".to_string();
    }

    let term_width = get_terminal_width();

    // "99." + space + "100.00" + gap + "100" + gap + "5.00?" + gap
    let index_width = 3;
    let percent_width = 6;
    let rounded_width = 3;
    let point_width = 5;
    let separator = "  ";
    let fixed_width =
        index_width + 1 + percent_width + rounded_width + point_width + separator.len() * 3;

    students
        .iter()
        .enumerate()
        .map(|(idx, student)| {
            let grade = student.grade;
            let index_str = format!("{:>2}.", idx + 1);
            let percent_str = format!(
                "{:>width$}",
                format_percentage(grade.final_percentage),
                width = percent_width
            );
            let rounded_str = format!("{:>width$}", grade.final_rounded, width = rounded_width);
            let point_str = format!(
                "{:<width$}",
                format!(
                    "{}{}",
                    format_grade_point(grade.grade_point),
                    source_marker(grade.grade_point_source)
                ),
                width = point_width
            );

            let name = match term_width {
                Some(width) if width > fixed_width + 10 => truncate_name(student.name, width - fixed_width),
                // Very narrow terminal, show truncated
                Some(_) => truncate_name(student.name, 20),
                // No terminal (pipe), don't truncate
                None => student.name.to_string(),
            };

            if use_colors {
                let point_colored = if grade.is_failing() {
                    point_str.red().bold().to_string()
                } else {
                    point_str.green().bold().to_string()
                };
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str.dimmed(),
                    percent_str,
                    separator,
                    rounded_str.dimmed(),
                    separator,
                    point_colored,
                    separator,
                    name
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str, percent_str, separator, rounded_str, separator, point_str, separator, name
                )
                .trim_end()
                .to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format one student's full breakdown (for verbose mode)
pub fn format_grade_detail(student: &GradedStudent, use_colors: bool) -> String {
    let g = student.grade;
    let lines = [
        format!("  Term: {}", g.term),
        format!(
            "  Quizzes: {} -> PG {} -> {}",
            format_raw(&g.quiz_raw),
            format_percentage(g.quiz_pg),
            format_percentage(g.quiz_weighted)
        ),
        format!(
            "  Class standing: {} -> PG {} (composite {}) -> {}",
            format_raw(&g.class_standing_raw),
            format_percentage(g.class_standing_pg),
            format_percentage(g.class_standing_composite),
            format_percentage(g.class_standing_weighted)
        ),
        format!(
            "  SEP: {} -> {}",
            format_percentage(g.sep_pg),
            format_percentage(g.sep_weighted)
        ),
        format!(
            "  Project: {} -> {}",
            format_percentage(g.project_pg),
            format_percentage(g.project_weighted)
        ),
        format!(
            "  Exam: {} -> PG {} -> {}",
            format_raw(&g.exam_raw),
            format_percentage(g.exam_pg),
            format_percentage(g.exam_weighted)
        ),
        format!(
            "  Final: {} ({})",
            format_percentage(g.final_percentage),
            g.final_rounded
        ),
    ];

    let point = format_grade_point(g.grade_point);
    let point_line = match g.grade_point_source {
        GradePointSource::Scale => format!("  Grade point: {}", point),
        GradePointSource::FailingFloor => format!("  Grade point: {} (at or below failing floor)", point),
        GradePointSource::UnmatchedFallback => {
            format!("  Grade point: {} (no scale entry matched)", point)
        }
    };

    let header = if use_colors {
        student.name.bold().to_string()
    } else {
        student.name.to_string()
    };
    let point_line = if use_colors && g.is_failing() {
        point_line.red().to_string()
    } else {
        point_line
    };

    std::iter::once(header)
        .chain(lines)
        .chain(std::iter::once(point_line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format graded students as tab-separated values for scripting
/// Columns: name, term, final percentage, rounded, grade point (no headers, no colors)
pub fn format_tsv(students: &[GradedStudent]) -> String {
    if students.is_empty() {
        return String::new();
    }

    students
        .iter()
        .map(|student| {
            format!(
                "{}\t{}\t{}\t{}\t{}",
                student.name,
                student.grade.term,
                format_percentage(student.grade.final_percentage),
                student.grade.final_rounded,
                format_grade_point(student.grade.grade_point)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the grade scale, highest band first
pub fn format_scale(scale: &GradeScale, use_colors: bool) -> String {
    if scale.is_empty() {
        return "No grade scale entries configured.".to_string();
    }

    scale
        .entries()
        .iter()
        .rev()
        .map(|entry| {
            let range = format!("{:>8}", entry.range_label());
            let point = format_grade_point(entry.grade_point);
            if use_colors {
                format!("{}  {}", range.dimmed(), point.bold())
            } else {
                format!("{}  {}", range, point)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::{
        compute_term_grade, ExamResult, ScoreBundle, ScoreItem, Term, WeightConfig,
    };
    use rust_decimal_macros::dec;

    fn sample_grade() -> ComputedGrade {
        let bundle = ScoreBundle {
            quizzes: vec![ScoreItem::new("Quiz 1", dec!(80), dec!(100))],
            class_standing: vec![ScoreItem::new("SW 1", dec!(45), dec!(50))],
            recitation: dec!(90),
            attendance: dec!(95),
            sep: dec!(100),
            project: dec!(90),
            finals: Some(ExamResult::new(dec!(150), dec!(200))),
            ..ScoreBundle::default()
        };
        compute_term_grade(
            &bundle,
            Some(&WeightConfig::default()),
            &GradeScale::default(),
            Term::Finals,
        )
        .unwrap()
    }

    fn failing_grade() -> ComputedGrade {
        compute_term_grade(
            &ScoreBundle::default(),
            Some(&WeightConfig::default()),
            &GradeScale::default(),
            Term::Finals,
        )
        .unwrap()
    }

    #[test]
    fn test_format_grade_point() {
        assert_eq!(format_grade_point(dec!(1.75)), "1.75");
        assert_eq!(format_grade_point(dec!(5)), "5.00");
        assert_eq!(format_grade_point(dec!(3.0)), "3.00");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(dec!(87.72)), "87.72");
        assert_eq!(format_percentage(dec!(0)), "0.00");
    }

    #[test]
    fn test_truncate_name_short() {
        assert_eq!(truncate_name("Santos, Maria", 20), "Santos, Maria");
    }

    #[test]
    fn test_truncate_name_long() {
        assert_eq!(truncate_name("Dela Cruz, Juan Miguel", 12), "Dela Cruz...");
    }

    #[test]
    fn test_truncate_name_very_narrow() {
        assert_eq!(truncate_name("Dela Cruz", 3), "Del");
    }

    #[test]
    fn test_format_grade_table_empty() {
        let students: Vec<GradedStudent> = vec![];
        assert_eq!(format_grade_table(&students, false), "No grades computed.");
    }

    #[test]
    fn test_format_grade_table_rows() {
        let passing = sample_grade();
        let failing = failing_grade();
        let students = vec![
            GradedStudent { name: "Dela Cruz, Juan", grade: &passing },
            GradedStudent { name: "Santos, Maria", grade: &failing },
        ];
        let result = format_grade_table(&students, false);
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(" 1."));
        assert!(lines[0].contains("87.72"));
        assert!(lines[0].contains(" 88"));
        assert!(lines[0].contains("1.75"));
        assert!(lines[0].contains("Dela Cruz, Juan"));
        assert!(lines[1].starts_with(" 2."));
        assert!(lines[1].contains("0.00"));
        assert!(lines[1].contains("5.00"));
    }

    #[test]
    fn test_format_grade_table_marks_fallback() {
        let grade = compute_term_grade(
            &ScoreBundle {
                sep: dec!(90),
                project: dec!(90),
                ..ScoreBundle::default()
            },
            Some(&WeightConfig {
                quiz: dec!(0),
                class_standing: dec!(0),
                sep: dec!(0.5),
                project: dec!(0.5),
                exam: dec!(0),
            }),
            &GradeScale::new(vec![]).unwrap(),
            Term::Midterm,
        )
        .unwrap();
        let students = vec![GradedStudent { name: "Ana", grade: &grade }];
        let result = format_grade_table(&students, false);
        assert!(result.contains("5.00?"));
    }

    #[test]
    fn test_format_grade_detail() {
        let grade = sample_grade();
        let student = GradedStudent { name: "Dela Cruz, Juan", grade: &grade };
        let result = format_grade_detail(&student, false);
        assert!(result.starts_with("Dela Cruz, Juan\n"));
        assert!(result.contains("Term: finals"));
        assert!(result.contains("Quizzes: 80/100 -> PG 86.00 -> 25.80"));
        assert!(result.contains("Class standing: 45/50 -> PG 93.00 (composite 92.67) -> 23.17"));
        assert!(result.contains("SEP: 100.00 -> 5.00"));
        assert!(result.contains("Project: 90.00 -> 9.00"));
        assert!(result.contains("Exam: 150/200 -> PG 82.50 -> 24.75"));
        assert!(result.contains("Final: 87.72 (88)"));
        assert!(result.ends_with("Grade point: 1.75"));
    }

    #[test]
    fn test_format_grade_detail_floor() {
        let grade = failing_grade();
        let student = GradedStudent { name: "Ana", grade: &grade };
        let result = format_grade_detail(&student, false);
        assert!(result.contains("Grade point: 5.00 (at or below failing floor)"));
    }

    #[test]
    fn test_format_tsv_empty() {
        let students: Vec<GradedStudent> = vec![];
        assert_eq!(format_tsv(&students), "");
    }

    #[test]
    fn test_format_tsv_single() {
        let grade = sample_grade();
        let students = vec![GradedStudent { name: "Dela Cruz, Juan", grade: &grade }];
        assert_eq!(format_tsv(&students), "Dela Cruz, Juan\tfinals\t87.72\t88\t1.75");
    }

    #[test]
    fn test_format_scale_highest_first() {
        let result = format_scale(&GradeScale::default(), false);
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "  97-100  1.00");
        assert_eq!(lines[8], "    <=75  3.00");
    }

    #[test]
    fn test_format_scale_empty() {
        let scale = GradeScale::new(vec![]).unwrap();
        assert_eq!(format_scale(&scale, false), "No grade scale entries configured.");
    }
}
