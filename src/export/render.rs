use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::config::ExportConfig;
use crate::error::{Error, Result};
use crate::export::graph::HierarchyGraph;

/// Renders graphs to PNG through the Graphviz `dot` binary.
#[derive(Debug, Clone)]
pub struct GraphRenderer {
    dot_binary: PathBuf,
    output_path: PathBuf,
}

impl GraphRenderer {
    pub fn new(dot_binary: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            dot_binary: dot_binary.into(),
            output_path: output_path.into(),
        }
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            dot_binary: config.dot_binary.clone(),
            output_path: config.output_path.clone(),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Render `graph` and replace the output file. The image is written to a
    /// sibling temp file first, so a failed render leaves no partial output.
    pub async fn render(&self, graph: &HierarchyGraph) -> Result<()> {
        let png = self.run_dot(&graph.to_dot()).await?;

        if let Some(parent) = self.output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| render_failed(format!("create {}", parent.display()), e))?;
        }

        let staging = self.output_path.with_extension("png.tmp");
        tokio::fs::write(&staging, &png)
            .await
            .map_err(|e| render_failed(format!("write {}", staging.display()), e))?;
        tokio::fs::rename(&staging, &self.output_path)
            .await
            .map_err(|e| render_failed(format!("replace {}", self.output_path.display()), e))?;

        log::info!(
            "rendered {} nodes and {} edges to {}",
            graph.nodes().len(),
            graph.edges().len(),
            self.output_path.display()
        );
        Ok(())
    }

    async fn run_dot(&self, dot: &str) -> Result<Vec<u8>> {
        let mut child = Command::new(&self.dot_binary)
            .arg("-Tpng")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| render_failed(format!("spawn {}", self.dot_binary.display()), e))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(dot.as_bytes())
                .await
                .map_err(|e| render_failed("write graph to dot".to_string(), e))?;
            // Dropping stdin closes the pipe so dot sees EOF
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| render_failed("wait for dot".to_string(), e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::RenderFailed(format!(
                "dot exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(output.stdout)
    }
}

fn render_failed(action: String, error: std::io::Error) -> Error {
    Error::RenderFailed(format!("{}: {}", action, error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::loader::Hierarchy;
    use crate::model::KnowledgeBase;

    fn one_node_graph() -> HierarchyGraph {
        HierarchyGraph::build(&Hierarchy {
            knowledge_bases: vec![KnowledgeBase::new("1", "KB1")],
            ..Hierarchy::default()
        })
    }

    /// A stand-in for `dot` that swallows its input and prints `contents`.
    #[cfg(unix)]
    fn fake_dot(dir: &Path, contents: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let script = dir.join("fake-dot");
        std::fs::write(
            &script,
            format!("#!/bin/sh\ncat > /dev/null\nprintf '%s' '{}'\n", contents),
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_render_creates_parent_and_replaces_output() {
        let dir = std::env::temp_dir()
            .join(format!("kb-hierarchy-render-ok-{}", std::process::id()));
        std::fs::remove_dir_all(&dir).ok();
        std::fs::create_dir_all(&dir).unwrap();
        let output = dir.join("nested").join("graph.png");
        let graph = one_node_graph();
        assert!(!output.parent().unwrap().exists());

        let first = GraphRenderer::new(fake_dot(&dir, "first-image"), &output);
        first.render(&graph).await.unwrap();
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "first-image");

        std::fs::write(&output, "stale").unwrap();
        let second = GraphRenderer::new(fake_dot(&dir, "second-image"), &output);
        second.render(&graph).await.unwrap();
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "second-image");
        assert!(!output.with_extension("png.tmp").exists());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_dot_keeps_previous_output() {
        use std::os::unix::fs::PermissionsExt;

        let dir = std::env::temp_dir()
            .join(format!("kb-hierarchy-render-err-{}", std::process::id()));
        std::fs::remove_dir_all(&dir).ok();
        std::fs::create_dir_all(&dir).unwrap();
        let output = dir.join("graph.png");
        std::fs::write(&output, "previous").unwrap();

        let script = dir.join("broken-dot");
        std::fs::write(
            &script,
            "#!/bin/sh\ncat > /dev/null\necho 'syntax error' >&2\nexit 1\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let result = GraphRenderer::new(&script, &output).render(&one_node_graph()).await;
        assert!(matches!(result, Err(Error::RenderFailed(ref msg)) if msg.contains("syntax error")));
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "previous");
        assert!(!output.with_extension("png.tmp").exists());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_missing_dot_binary_writes_nothing() {
        let output = std::env::temp_dir()
            .join(format!("kb-hierarchy-render-{}", std::process::id()))
            .join("graph.png");
        let renderer = GraphRenderer::new("/nonexistent/graphviz/dot", &output);

        let result = renderer.render(&one_node_graph()).await;
        assert!(matches!(result, Err(Error::RenderFailed(_))));
        assert!(!output.exists());
        assert!(!output.with_extension("png.tmp").exists());
    }

    #[test]
    fn test_from_config() {
        let renderer = GraphRenderer::from_config(&ExportConfig::default());
        assert_eq!(renderer.output_path(), Path::new("pictures/graph.png"));
    }
}
