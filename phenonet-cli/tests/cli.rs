use assert_cmd::Command;
use predicates::prelude::*;

use phenonet_test::TestDataset;

fn phenonet() -> Command {
    let mut cmd = Command::cargo_bin("phenonet").unwrap();
    cmd.arg("--quiet").env_remove("RUST_LOG");
    cmd
}

// ── view ─────────────────────────────────────────────────────────

#[test]
fn view_prints_text_table() {
    let data = TestDataset::standard();
    phenonet()
        .args(["view", "250", "--data-dir"])
        .arg(data.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Graph for meta"))
        .stdout(predicate::str::contains("4 nodes, 4 edges"))
        .stdout(predicate::str::contains("Anchors: 250"))
        .stdout(predicate::str::contains("Obesity"));
}

#[test]
fn view_json_is_a_snapshot() {
    let data = TestDataset::standard();
    let output = phenonet()
        .args(["view", "250", "--format", "json", "--pvalue", "-8", "--data-dir"])
        .arg(data.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["generation"], 0);
    let nodes = json["graph"]["nodes"].as_array().unwrap();
    let ids: Vec<&str> = nodes.iter().filter_map(|n| n["id"].as_str()).collect();
    // At 1e-8 only rs1 keeps two associations.
    assert!(ids.contains(&"rs1"));
    assert!(!ids.contains(&"rs2"));
    assert!(ids.contains(&"250"));
}

#[test]
fn view_dot_output() {
    let data = TestDataset::standard();
    phenonet()
        .args(["view", "250", "--format", "dot", "--data-dir"])
        .arg(data.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("graph phenonet {"));
}

#[test]
fn view_comparison_mode() {
    let data = TestDataset::standard();
    phenonet()
        .args([
            "view", "250", "--ancestry", "eur", "--compare", "afr", "--pvalue2", "-2",
            "--data-dir",
        ])
        .arg(data.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Graph for eur vs afr"))
        .stdout(predicate::str::contains("p2 < 1e-2"));
}

#[test]
fn missing_phenotype_exits_3() {
    let data = TestDataset::standard();
    phenonet()
        .args(["view", "999", "--data-dir"])
        .arg(data.path())
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Data file not found"));
}

#[test]
fn bad_threshold_exits_2() {
    let data = TestDataset::standard();
    phenonet()
        .args(["view", "250", "--beta", "1.5", "--data-dir"])
        .arg(data.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid beta"));
}

#[test]
fn unavailable_ancestry_exits_4() {
    let data = TestDataset::standard();
    phenonet()
        .args(["view", "250", "--ancestry", "amr", "--data-dir"])
        .arg(data.path())
        .assert()
        .code(4)
        .stderr(predicate::str::contains("amr has no data"));
}

#[test]
fn interactive_view_renders_last_parameters() {
    let data = TestDataset::standard();
    phenonet()
        .args(["view", "250", "--interactive", "--data-dir"])
        .arg(data.path())
        .write_stdin("# tighten\npvalue -12\nbogus line\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 nodes, 0 edges"))
        .stderr(predicate::str::contains("Ignored: unknown update"))
        .stderr(predicate::str::contains("generation 1: 1 nodes, 0 edges"));
}

#[test]
fn interactive_view_rejects_ancestry_without_data() {
    let data = TestDataset::standard();
    phenonet()
        .args(["view", "250", "--interactive", "--data-dir"])
        .arg(data.path())
        .write_stdin("ancestry amr\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Graph for meta"))
        .stdout(predicate::str::contains("4 nodes, 4 edges"))
        .stderr(predicate::str::contains("Ignored: Ancestry amr has no data for 250"))
        .stderr(predicate::str::contains("generation").not());
}

#[test]
fn interactive_pair_rejects_comparison_without_data() {
    let data = TestDataset::standard();
    phenonet()
        .args(["pair", "250", "401", "--ancestry", "eur", "--interactive", "--data-dir"])
        .arg(data.path())
        .write_stdin("compare eas\ncompare afr\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Graph for eur vs afr"))
        .stderr(predicate::str::contains("Ignored: Ancestry eas has no data for 250"))
        .stderr(predicate::str::contains("generation 1:"));
}

// ── pair ─────────────────────────────────────────────────────────

#[test]
fn pair_shows_shared_snps() {
    let data = TestDataset::standard();
    phenonet()
        .args(["pair", "250", "401", "--ancestry", "eur", "--data-dir"])
        .arg(data.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Anchors: 250, 401"))
        .stdout(predicate::str::contains("4 nodes, 4 edges"));
}

#[test]
fn pair_without_shared_snps_exits_4() {
    let data = TestDataset::standard();
    phenonet()
        .args(["pair", "250", "555", "--data-dir"])
        .arg(data.path())
        .assert()
        .code(4)
        .stderr(predicate::str::contains("share no SNPs"));
}

// ── overview ─────────────────────────────────────────────────────

#[test]
fn overview_graph() {
    let data = TestDataset::standard();
    phenonet()
        .args(["overview", "--ancestry", "eur", "--data-dir"])
        .arg(data.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Overview for eur at p 1e-04"))
        .stdout(predicate::str::contains("4 nodes, 3 edges"));
}

#[test]
fn overview_neighbors_and_search() {
    let data = TestDataset::standard();
    phenonet()
        .args(["overview", "--node", "555", "--data-dir"])
        .arg(data.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Neighbors of 555 (2)"))
        .stdout(predicate::str::contains("Gout"));

    phenonet()
        .args(["overview", "--search", "obes", "--data-dir"])
        .arg(data.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Matches for 'obes' (1)"));
}

#[test]
fn overview_missing_column_exits_4() {
    let data = TestDataset::standard();
    phenonet()
        .args(["overview", "--ancestry", "afr", "--data-dir"])
        .arg(data.path())
        .assert()
        .code(4)
        .stderr(predicate::str::contains("afr_1e-04_same_dir_weight"));
}

#[test]
fn overview_neighbors_as_dot() {
    let data = TestDataset::standard();
    phenonet()
        .args(["overview", "--node", "555", "--format", "dot", "--data-dir"])
        .arg(data.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("graph phenonet {"))
        .stdout(predicate::str::contains(r#""274" [label="Gout""#));
}

// ── ancestries / config ──────────────────────────────────────────

#[test]
fn ancestries_lists_availability() {
    let data = TestDataset::standard();
    phenonet()
        .args(["ancestries", "250", "--data-dir"])
        .arg(data.path())
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"eur\s+available").unwrap())
        .stdout(predicate::str::is_match(r"amr\s+no data").unwrap());
}

#[test]
fn config_from_data_dir_overrides_defaults() {
    let data = TestDataset::standard();
    data.write("phenonet.toml", "[pair_view]\nmax_primaries = 25\n");

    phenonet()
        .args(["config", "--data-dir"])
        .arg(data.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("max_primaries = 25"));

    phenonet()
        .args(["config", "--defaults", "--data-dir"])
        .arg(data.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("max_primaries = 100"));
}

#[test]
fn invalid_config_exits_2() {
    let data = TestDataset::standard();
    data.write("phenonet.toml", "[filter\n");
    phenonet()
        .args(["view", "250", "--data-dir"])
        .arg(data.path())
        .assert()
        .code(2);
}
