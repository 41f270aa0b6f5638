//! Analysis and plot functions that can be picked by name, e.g. from the
//! command line of the `pioneer` tool.

use std::path::Path;
use std::sync::Arc;

use blackhole_runtime::string_error::ErrorStringExt;

use super::{AnalysisFn, AnalysisOutcome, PlotFn, ResultMap};
use crate::control::ParamValue;
use crate::figure::Figure;

pub const ANALYSIS_FUNCTIONS: &[&str] = &["analyze", "summary"];
pub const PLOT_FUNCTIONS: &[&str] = &["main", "overlay"];

pub fn analysis_by_name(name: &str) -> Option<AnalysisFn> {
    match name {
        "analyze" => Some(Arc::new(analyze_columns)),
        "summary" => Some(Arc::new(summarize_columns)),
        _ => None,
    }
}

pub fn plot_by_name(name: &str) -> Option<PlotFn> {
    match name {
        "main" => Some(Box::new(plot_each_series)),
        "overlay" => Some(Box::new(plot_overlay)),
        _ => None,
    }
}

/// Numeric columns of delimited text, after skipping `skip_lines` lines.
///
/// The first remaining line holds the column names. Fields that are not
/// numbers become NaN, and columns without a single number are dropped.
pub fn parse_columns(text: &str, skip_lines: usize) -> Result<Vec<(String, Vec<f64>)>, String> {
    let body: String = text
        .lines()
        .skip(skip_lines)
        .map(|line| format!("{line}\n"))
        .collect();
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let mut columns: Vec<(String, Vec<f64>)> = reader
        .headers()
        .err_to_string("could not read column names")?
        .iter()
        .map(|name| (name.to_owned(), Vec::new()))
        .collect();
    if columns.is_empty() {
        return Err("no columns found".into());
    }

    for (row, record) in reader.records().enumerate() {
        let record = record.err_to_string(&format!("could not read row {row}"))?;
        for (idx, (_, values)) in columns.iter_mut().enumerate() {
            let value = record
                .get(idx)
                .and_then(|field| field.parse::<f64>().ok())
                .unwrap_or(f64::NAN);
            values.push(value);
        }
    }
    columns.retain(|(_, values)| values.iter().any(|v| !v.is_nan()));
    Ok(columns)
}

fn read_columns(file: &Path) -> Result<Vec<(String, Vec<f64>)>, String> {
    let text = std::fs::read_to_string(file).err_to_string("could not read file")?;
    parse_columns(&text, 0)
}

/// Every numeric column as a list of numbers.
fn analyze_columns(file: &Path) -> AnalysisOutcome {
    let columns = read_columns(file)?;
    let mut results = ResultMap::new();
    for (name, values) in columns.iter() {
        let values = values.iter().map(|v| number(*v)).collect();
        results.insert(name.clone(), ParamValue::Array(values));
    }
    Ok((format!("read {} columns", results.len()), results))
}

/// Count, mean, minimum and maximum of every numeric column.
fn summarize_columns(file: &Path) -> AnalysisOutcome {
    let columns = read_columns(file)?;
    let mut results = ResultMap::new();
    for (name, values) in columns.iter() {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let count = finite.len();
        let mean = finite.iter().sum::<f64>() / count.max(1) as f64;
        let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        results.insert(
            name.clone(),
            serde_json::json!({
                "count": count,
                "mean": number(mean),
                "min": number(min),
                "max": number(max),
            }),
        );
    }
    Ok((format!("summarized {} columns", results.len()), results))
}

fn number(value: f64) -> ParamValue {
    serde_json::Number::from_f64(value)
        .map(ParamValue::Number)
        .unwrap_or(ParamValue::Null)
}

fn series(value: &ParamValue) -> Option<Vec<f64>> {
    value
        .as_array()
        .map(|vals| vals.iter().map(|v| v.as_f64().unwrap_or(f64::NAN)).collect())
}

/// One figure per result series.
fn plot_each_series(results: &ResultMap, file: &Path) -> Result<Vec<Figure>, String> {
    let figures: Vec<Figure> = results
        .iter()
        .filter_map(|(name, value)| Some(name).zip(series(value)))
        .map(|(name, ys)| {
            Figure::new(name)
                .with_labels("index", name)
                .with_series(name, &ys)
        })
        .collect();
    if figures.is_empty() && !results.is_empty() {
        return Err(format!("no plottable series in results for {:?}", file));
    }
    Ok(figures)
}

/// All result series in a single figure titled after the file.
fn plot_overlay(results: &ResultMap, file: &Path) -> Result<Vec<Figure>, String> {
    let title = file
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("unreadable filename");
    let mut figure = Figure::new(title).with_labels("index", "value");
    for (name, ys) in results
        .iter()
        .filter_map(|(name, value)| Some(name).zip(series(value)))
    {
        figure = figure.with_series(name, &ys);
    }
    Ok(vec![figure])
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_columns_skips_header_lines() {
        let text = "LECROY,1\nSegments,1\nTrigger,0\nnotes\nTime,Ampl\n0.0, 1.5\n1e-9,-2\n";
        let columns = parse_columns(text, 4).unwrap();
        assert_eq!(
            columns,
            vec![
                ("Time".to_string(), vec![0.0, 1e-9]),
                ("Ampl".to_string(), vec![1.5, -2.0])
            ]
        );
    }

    #[test]
    fn test_parse_columns_drops_text_columns() {
        let text = "label,value\nx,1\ny,\nz,3\n";
        let columns = parse_columns(text, 0).unwrap();
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].0, "value");
        assert_eq!(columns[0].1[0], 1.0);
        assert!(columns[0].1[1].is_nan());
    }

    #[test]
    fn test_builtin_lookup() {
        for name in ANALYSIS_FUNCTIONS {
            assert!(analysis_by_name(name).is_some());
        }
        for name in PLOT_FUNCTIONS {
            assert!(plot_by_name(name).is_some());
        }
        assert!(analysis_by_name("nope").is_none());
        assert!(plot_by_name("nope").is_none());
    }

    #[test]
    fn test_analyze_missing_file_fails() {
        let analyze = analysis_by_name("analyze").unwrap();
        let res = analyze(Path::new("/definitely/not/here.csv"));
        assert!(res.unwrap_err().starts_with("could not read file"));
    }

    #[test]
    fn test_analyze_and_summarize_file() {
        let path = std::env::temp_dir().join(format!(
            "blackhole_builtin_test_{}.csv",
            std::process::id()
        ));
        std::fs::write(&path, "a,b\n1,2.5\n2,3.5\n3,\n").unwrap();

        let (msg, results) = analysis_by_name("analyze").unwrap()(&path).unwrap();
        let (_, summary) = analysis_by_name("summary").unwrap()(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(msg, "read 2 columns");
        assert_eq!(results["a"], json!([1.0, 2.0, 3.0]));
        assert_eq!(results["b"], json!([2.5, 3.5, null]));
        assert_eq!(summary["b"]["count"], json!(2));
        assert_eq!(summary["b"]["mean"], json!(3.0));
        assert_eq!(summary["a"]["max"], json!(3.0));
    }

    #[test]
    fn test_plot_functions() {
        let mut results = ResultMap::new();
        results.insert("a".into(), json!([1, 2, 3]));
        results.insert("b".into(), json!([2.1, 2.2]));
        results.insert("note".into(), json!("not a series"));

        let figures = plot_by_name("main").unwrap()(&results, Path::new("f.csv")).unwrap();
        assert_eq!(figures.len(), 2);
        assert_eq!(figures[0].title, "a");
        assert_eq!(figures[1].traces[0].points, vec![[0.0, 2.1], [1.0, 2.2]]);

        let overlay = plot_by_name("overlay").unwrap()(&results, Path::new("/x/f.csv")).unwrap();
        assert_eq!(overlay.len(), 1);
        assert_eq!(overlay[0].title, "f.csv");
        assert_eq!(overlay[0].traces.len(), 2);

        let mut text_only = ResultMap::new();
        text_only.insert("note".into(), json!("x"));
        assert!(plot_by_name("main").unwrap()(&text_only, Path::new("f.csv")).is_err());
        assert_eq!(
            plot_by_name("main").unwrap()(&ResultMap::new(), Path::new("f.csv")),
            Ok(vec![])
        );
    }
}
