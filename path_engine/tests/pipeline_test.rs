//! End-to-end runs of the path valuation pipeline against CSV files on disk

use path_engine::{run, FailureClass, NodePair, PathTotals, PathValueError, PipelineConfig, TotalsFormat};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_input(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("input.csv");
    fs::write(&path, contents).unwrap();
    path
}

fn config(input: &Path, dir: &TempDir, node_i: &str, node_j: &str) -> PipelineConfig {
    PipelineConfig::new(input, dir.path().join("hourly.csv"))
        .with_nodes(NodePair::new(node_i, node_j).unwrap())
}

fn parse_hourly(path: &Path) -> Vec<(String, String, f64)> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, vec!["h", "path", "v_hourly"]);
    reader
        .records()
        .map(|r| {
            let r = r.unwrap();
            (r[0].to_string(), r[1].to_string(), r[2].parse().unwrap())
        })
        .collect()
}

#[test]
fn test_two_row_scenario() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "h,n,rho,gamma,v,df\n1,A,X,Y,10,0.6\n1,B,X,Y,10,0.2\n");
    let config = config(&input, &dir, "A", "B").with_totals(TotalsFormat::Text);

    let report = run(&config).unwrap();

    let rows = parse_hourly(&config.output_hourly);
    assert_eq!(rows.len(), 2);
    assert_eq!((rows[0].0.as_str(), rows[0].1.as_str()), ("1", "(A, B)"));
    assert!((rows[0].2 - 4.0).abs() < 1e-12);
    assert_eq!((rows[1].0.as_str(), rows[1].1.as_str()), ("1", "(B, A)"));
    assert!((rows[1].2 + 4.0).abs() < 1e-12);

    assert_eq!(report.hourly_rows, 2);
    assert_eq!(report.stats.usable_rows, 2);
    assert_eq!(report.totals.len(), 2);
    let PathTotals { path, vobl, vopt } = &report.totals[0];
    assert_eq!(path, "(A, B)");
    assert!((vobl - 4.0).abs() < 1e-12 && (vopt - 4.0).abs() < 1e-12);
    let PathTotals { path, vobl, vopt } = &report.totals[1];
    assert_eq!(path, "(B, A)");
    assert!((vobl + 4.0).abs() < 1e-12 && vopt.abs() < 1e-12);

    assert_eq!(
        report.summary.as_deref(),
        Some("(A, B): vobl=4.000000, vopt=4.000000\n(B, A): vobl=-4.000000, vopt=0.000000")
    );
}

#[test]
fn test_schema_failure_lists_df() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "h,n,rho,gamma,v\n1,A,X,Y,10\n");

    let err = run(&config(&input, &dir, "A", "B")).unwrap_err();

    match &err {
        PathValueError::Schema { missing } => assert_eq!(missing, &vec!["df".to_string()]),
        other => panic!("expected schema error, got {:?}", other),
    }
    assert_eq!(err.failure_class(), FailureClass::Schema);
    assert!(!dir.path().join("hourly.csv").exists());
}

#[test]
fn test_pair_without_data_is_computation_failure() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "h,n,rho,gamma,v,df\n1,C,X,Y,10,0.6\n1,D,X,Y,10,0.2\n");

    let err = run(&config(&input, &dir, "A", "B")).unwrap_err();

    assert!(matches!(err, PathValueError::EmptyInput { .. }));
    assert_eq!(err.failure_class(), FailureClass::Computation);
}

#[test]
fn test_all_rows_unusable_is_empty_input() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "h,n,rho,gamma,v,df\nx,A,X,Y,10,0.6\n1,B,X,Y,n/a,0.2\n");

    let err = run(&config(&input, &dir, "A", "B")).unwrap_err();
    assert!(matches!(err, PathValueError::EmptyInput { .. }));
}

#[test]
fn test_unobserved_endpoint_and_dirty_rows() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        "gamma,df,h,v,rho,n,comment\n\
         Y,0.5,2,8,X,A,ok\n\
         Y,0.25,1,10,X,A,ok\n\
         Z,0.5,1,-4,X,A,ok\n\
         Y,bad,1,10,X,A,dropped\n\
         Y,0.9,1,10,X,C,other node\n",
    );

    let report = run(&config(&input, &dir, "A", "B")).unwrap();

    assert_eq!(report.stats.total_rows, 5);
    assert_eq!(report.stats.other_node_rows, 1);
    assert_eq!(report.stats.incomplete_rows, 1);

    let rows = parse_hourly(&dir.path().join("hourly.csv"));
    let forward: Vec<f64> = rows.iter().filter(|r| r.1 == "(A, B)").map(|r| r.2).collect();
    assert_eq!(forward.len(), 2);
    assert!((forward[0] - (10.0 * 0.25 + -4.0 * 0.5)).abs() < 1e-12);
    assert!((forward[1] - 8.0 * 0.5).abs() < 1e-12);
}

#[test]
fn test_reruns_are_byte_identical() {
    let dir = TempDir::new().unwrap();
    let mut contents = String::from("h,n,rho,gamma,v,df\n");
    for i in 0..120 {
        let node = if i % 3 == 0 { "B" } else { "A" };
        contents.push_str(&format!(
            "{},{},r{},g{},{:.3},{:.4}\n",
            (i * 7) % 11,
            node,
            i % 4,
            i % 3,
            (i as f64) * 1.7 - 50.0,
            ((i as f64) * 0.3).sin()
        ));
    }
    let input = write_input(&dir, &contents);

    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");
    let nodes = NodePair::new("A", "B").unwrap();
    run(&PipelineConfig::new(&input, &first).with_nodes(nodes.clone())).unwrap();
    run(&PipelineConfig::new(&input, &second).with_nodes(nodes)).unwrap();

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());

    let rows = parse_hourly(&first);
    for pair in rows.chunks(2) {
        assert_eq!(pair[0].0, pair[1].0);
        assert_eq!(pair[0].1, "(A, B)");
        assert_eq!(pair[1].1, "(B, A)");
        assert_eq!(pair[0].2, -pair[1].2);
    }
}

#[test]
fn test_json_summary() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "h,n,rho,gamma,v,df\n1,A,X,Y,10,0.6\n1,B,X,Y,10,0.2\n");
    let config = config(&input, &dir, "B", "A").with_totals(TotalsFormat::Json);

    let report = run(&config).unwrap();

    let parsed: Vec<PathTotals> = serde_json::from_str(report.summary.as_deref().unwrap()).unwrap();
    assert_eq!(parsed, report.totals);
    assert_eq!(parsed[0].path, "(A, B)");
}

#[test]
fn test_unwritable_output_is_write_failure() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "h,n,rho,gamma,v,df\n1,A,X,Y,10,0.6\n");
    let config = PipelineConfig::new(&input, dir.path().join("missing").join("hourly.csv"))
        .with_nodes(NodePair::new("A", "B").unwrap());

    let err = run(&config).unwrap_err();
    assert_eq!(err.failure_class(), FailureClass::OutputWrite);
}

#[test]
fn test_padded_numbers_keep_their_rows() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "h,n,rho,gamma,v,df\n1,A,X,Y, 10,0.6\n1,B,X,Y,10 ,0.2\n");

    let report = run(&config(&input, &dir, "A", "B")).unwrap();

    assert_eq!(report.stats.incomplete_rows, 0);
    let rows = parse_hourly(&dir.path().join("hourly.csv"));
    assert_eq!(rows[0].1, "(A, B)");
    assert!((rows[0].2 - 4.0).abs() < 1e-12);
    assert_eq!(rows[1].1, "(B, A)");
    assert!((rows[1].2 + 4.0).abs() < 1e-12);
}

#[test]
fn test_na_scenario_key_drops_the_row() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "h,n,rho,gamma,v,df\n1,A,NA,Y,10,0.6\n1,B,X,Y,10,0.2\n");

    let report = run(&config(&input, &dir, "A", "B")).unwrap();

    assert_eq!(report.stats.usable_rows, 1);
    assert_eq!(report.stats.incomplete_rows, 1);
    let rows = parse_hourly(&dir.path().join("hourly.csv"));
    assert_eq!(rows[0].1, "(A, B)");
    assert!((rows[0].2 + 2.0).abs() < 1e-12);
}
