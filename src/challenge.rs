//! Batch query files: one `<source> <target>` pair per line in, one distance
//! (or `-1` when unreachable) per line out.

use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};

use crate::dijkstra::ShortestPathEngine;
use crate::error::{GraphError, Result};
use crate::graph::NodeId;
use crate::path::PathResult;

/// Output value for a target that cannot be reached.
pub const UNREACHABLE_OUTPUT: &str = "-1";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChallengeMode {
    /// One full search per run of lines sharing a source.
    #[default]
    OneToAll,
    /// One early-exit search per line.
    PointToPoint,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChallengeSummary {
    pub queries: usize,
    pub searches: usize,
    pub unreachable: usize,
}

/// Answer every query in `input`, appending results to `output` (created if missing).
pub fn run_challenge_files(
    engine: &ShortestPathEngine<'_>,
    input: &Path,
    output: &Path,
    mode: ChallengeMode,
) -> Result<ChallengeSummary> {
    let reader = File::open(input).map_err(io_error(input))?;
    let writer = OpenOptions::new()
        .create(true)
        .append(true)
        .open(output)
        .map_err(io_error(output))?;
    run_challenge(engine, reader, writer, mode)
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> GraphError + '_ {
    move |source| GraphError::Io {
        path: path.to_path_buf(),
        source,
    }
}

pub fn run_challenge<R: Read, W: Write>(
    engine: &ShortestPathEngine<'_>,
    input: R,
    output: W,
    mode: ChallengeMode,
) -> Result<ChallengeSummary> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b' ')
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .comment(Some(b'#'))
        .from_reader(input);
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(output);

    let mut summary = ChallengeSummary::default();
    let mut current: Option<PathResult<'_>> = None;

    for record in rdr.records() {
        let record = record?;
        let (source, target) = parse_query(&record)?;

        let distance = match mode {
            ChallengeMode::OneToAll => {
                let result = match current.take() {
                    Some(result) if result.start() == source => result,
                    _ => {
                        tracing::debug!(source, "computing one-to-all");
                        summary.searches += 1;
                        engine.one_to_all(source)?
                    }
                };
                let distance = result.distance_to(target)?;
                current = Some(result);
                distance
            }
            ChallengeMode::PointToPoint => {
                summary.searches += 1;
                engine.point_to_point(source, target)?.distance_to(target)?
            }
        };

        summary.queries += 1;
        match distance {
            Some(d) => wtr.write_record([d.to_string()])?,
            None => {
                summary.unreachable += 1;
                wtr.write_record([UNREACHABLE_OUTPUT])?
            }
        }
    }

    wtr.flush().map_err(csv::Error::from)?;
    Ok(summary)
}

fn parse_query(record: &StringRecord) -> Result<(NodeId, NodeId)> {
    let line = record.position().map_or(0, |p| p.line() as usize);
    let invalid = |message: String| GraphError::Challenge { line, message };

    // Repeated spaces show up as empty fields.
    let mut fields = record.iter().filter(|f| !f.is_empty());
    let (source, target) = match (fields.next(), fields.next()) {
        (Some(s), Some(t)) => (s, t),
        _ => return Err(invalid("expected `<source> <target>`".to_string())),
    };
    let parse = |field: &str| {
        field
            .parse::<NodeId>()
            .map_err(|e| invalid(format!("bad node id {field:?}: {e}")))
    };
    Ok((parse(source)?, parse(target)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphStore;

    fn diamond() -> GraphStore {
        let input = "5\n4\n0 0 0 0\n1 0 0 0\n2 0 0 0\n3 0 0 0\n4 0 0 0\n0 1 4\n0 2 1\n1 3 1\n2 1 1\n";
        GraphStore::from_reader(input.as_bytes()).unwrap()
    }

    fn run(input: &str, mode: ChallengeMode) -> (String, ChallengeSummary) {
        let graph = diamond();
        let engine = ShortestPathEngine::new(&graph);
        let mut out = Vec::new();
        let summary = run_challenge(&engine, input.as_bytes(), &mut out, mode).unwrap();
        (String::from_utf8(out).unwrap(), summary)
    }

    #[test]
    fn one_to_all_reuses_consecutive_sources() {
        let (out, summary) = run("0 3\n0 1\n0 4\n2 3\n0 0\n", ChallengeMode::OneToAll);
        assert_eq!(out, "3\n2\n-1\n2\n0\n");
        assert_eq!(
            summary,
            ChallengeSummary {
                queries: 5,
                searches: 3,
                unreachable: 1
            }
        );
    }

    #[test]
    fn point_to_point_gives_same_answers() {
        let input = "0 3\n0 1\n0 4\n2 3\n0 0\n";
        let (out, summary) = run(input, ChallengeMode::PointToPoint);
        assert_eq!(out, "3\n2\n-1\n2\n0\n");
        assert_eq!(summary.searches, 5);
    }

    #[test]
    fn tolerates_padding_and_blank_lines() {
        let (out, _) = run("  0   3 \n\n1 3\n", ChallengeMode::OneToAll);
        assert_eq!(out, "3\n1\n");
    }

    #[test]
    fn rejects_malformed_line() {
        let graph = diamond();
        let engine = ShortestPathEngine::new(&graph);
        let err = run_challenge(&engine, "0 1\nzero 1\n".as_bytes(), Vec::new(), ChallengeMode::OneToAll)
            .unwrap_err();
        assert!(matches!(err, GraphError::Challenge { line: 2, .. }), "{err:?}");
        let err = run_challenge(&engine, "7\n".as_bytes(), Vec::new(), ChallengeMode::OneToAll)
            .unwrap_err();
        assert!(matches!(err, GraphError::Challenge { line: 1, .. }), "{err:?}");
    }

    #[test]
    fn rejects_unknown_node() {
        let graph = diamond();
        let engine = ShortestPathEngine::new(&graph);
        let err = run_challenge(&engine, "0 9\n".as_bytes(), Vec::new(), ChallengeMode::PointToPoint)
            .unwrap_err();
        assert!(matches!(err, GraphError::InvalidNode { id: 9, .. }), "{err:?}");
    }
}
