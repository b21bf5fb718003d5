use std::fs;

use routegraph::{run_challenge_files, ChallengeMode, GraphError, GraphStore, ShortestPathEngine};

const GRAPH: &str = "\
# two components: 0 -> 1 -> 2 and 3 <-> 4
5
4
0 100 48.0 9.0 0
1 101 48.1 9.1 0
2 102 48.2 9.2 0
3 103 50.0 8.0 0
4 104 50.1 8.1 0
0 1 10
1 2 15
3 4 2
4 3 3
";

const QUERIES: &str = "0 2\n0 1\n0 3\n3 4\n4 3\n2 0\n";
const ANSWERS: &str = "25\n10\n-1\n2\n3\n-1\n";

fn setup() -> (tempfile::TempDir, GraphStore) {
    let dir = tempfile::tempdir().unwrap();
    let graph_path = dir.path().join("graph.fmi");
    fs::write(&graph_path, GRAPH).unwrap();
    fs::write(dir.path().join("queries.txt"), QUERIES).unwrap();
    let graph = GraphStore::load(&graph_path).unwrap();
    (dir, graph)
}

#[test]
fn both_modes_write_the_same_answers() {
    let (dir, graph) = setup();
    let engine = ShortestPathEngine::new(&graph);
    let input = dir.path().join("queries.txt");

    for (mode, name) in [
        (ChallengeMode::OneToAll, "one_to_all.txt"),
        (ChallengeMode::PointToPoint, "point_to_point.txt"),
    ] {
        let output = dir.path().join(name);
        let summary = run_challenge_files(&engine, &input, &output, mode).unwrap();
        assert_eq!(summary.queries, 6);
        assert_eq!(summary.unreachable, 2);
        assert_eq!(fs::read_to_string(&output).unwrap(), ANSWERS);
    }
}

#[test]
fn one_to_all_searches_once_per_source_run() {
    let (dir, graph) = setup();
    let engine = ShortestPathEngine::new(&graph);
    let summary = run_challenge_files(
        &engine,
        &dir.path().join("queries.txt"),
        &dir.path().join("out.txt"),
        ChallengeMode::OneToAll,
    )
    .unwrap();
    // Sources 0,0,0 | 3 | 4 | 2
    assert_eq!(summary.searches, 4);
}

#[test]
fn output_is_appended() {
    let (dir, graph) = setup();
    let engine = ShortestPathEngine::new(&graph);
    let input = dir.path().join("queries.txt");
    let output = dir.path().join("out.txt");
    fs::write(&output, "previous\n").unwrap();

    run_challenge_files(&engine, &input, &output, ChallengeMode::PointToPoint).unwrap();
    run_challenge_files(&engine, &input, &output, ChallengeMode::PointToPoint).unwrap();

    let expected = format!("previous\n{ANSWERS}{ANSWERS}");
    assert_eq!(fs::read_to_string(&output).unwrap(), expected);
}

#[test]
fn missing_input_is_io_error() {
    let (dir, graph) = setup();
    let engine = ShortestPathEngine::new(&graph);
    let err = run_challenge_files(
        &engine,
        &dir.path().join("nope.txt"),
        &dir.path().join("out.txt"),
        ChallengeMode::OneToAll,
    )
    .unwrap_err();
    assert!(matches!(err, GraphError::Io { .. }), "{err:?}");
}
