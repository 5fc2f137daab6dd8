/// Optional graph import helpers, not part of the core counting contract.
///
/// A tree decomposition is always derived in-crate from the pattern graph
/// (see `td_producer` and `tree_decompositions`), so only a plain graph
/// importer is needed here — the public API never accepts a pre-built
/// decomposition.
pub mod io {
    use crate::error::HomomorphismError;
    use crate::graph::graph::Graph;
    use std::fs::File;
    use std::io::{BufRead, BufReader};
    use std::path::Path;

    /// Reads a graph in METIS format (see
    /// <https://www.lrz.de/services/software/mathematik/metis/metis_5_0.pdf>):
    /// a header line `n m`, followed by one line per vertex listing its
    /// 1-based neighbour indices. Returns `HomomorphismError::Io` on a
    /// malformed file rather than panicking.
    pub fn import_metis<P: AsRef<Path>>(path: P) -> Result<Graph, HomomorphismError> {
        let file = File::open(path)?;
        let mut lines = BufReader::new(file).lines();

        let header = lines
            .next()
            .ok_or_else(|| HomomorphismError::Io("empty METIS file".to_string()))??;
        let mut header_fields = header.split_whitespace();
        let n: usize = header_fields
            .next()
            .ok_or_else(|| HomomorphismError::Io("missing vertex count in METIS header".to_string()))?
            .parse()
            .map_err(|_| HomomorphismError::Io("invalid vertex count in METIS header".to_string()))?;

        let mut edges = Vec::new();
        for (vertex, line) in lines.enumerate() {
            if vertex >= n {
                break;
            }
            let line = line?;
            for token in line.split_whitespace() {
                let neighbour: usize = token
                    .parse()
                    .map_err(|_| HomomorphismError::Io(format!("invalid neighbour index {token:?}")))?;
                if neighbour == 0 {
                    return Err(HomomorphismError::Io(
                        "METIS vertex indices are 1-based; got 0".to_string(),
                    ));
                }
                let neighbour = neighbour - 1;
                if vertex < neighbour {
                    edges.push((vertex as u32, neighbour as u32));
                }
            }
        }

        Graph::try_new(n, &edges)
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::io::Write;

        #[test]
        fn imports_a_small_triangle() {
            let mut file = tempfile_for_test();
            writeln!(file, "3 3").unwrap();
            writeln!(file, "2 3").unwrap();
            writeln!(file, "1 3").unwrap();
            writeln!(file, "1 2").unwrap();
            let graph = import_metis(file.path()).unwrap();
            assert_eq!(graph.vertex_count(), 3);
            assert_eq!(graph.edge_count(), 3);
        }

        #[test]
        fn rejects_missing_file() {
            let err = import_metis("/no/such/file.metis").unwrap_err();
            assert!(matches!(err, HomomorphismError::Io(_)));
        }

        fn tempfile_for_test() -> tempfile::NamedTempFile {
            tempfile::NamedTempFile::new().unwrap()
        }
    }
}
