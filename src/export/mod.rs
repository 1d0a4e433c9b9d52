pub mod graph;
pub mod loader;
pub mod render;

pub use graph::*;
pub use loader::*;
pub use render::*;

use crate::error::Result;
use crate::store::traits::Store;

/// Load the hierarchy from `store`, build its graph and render it.
pub async fn export_graph<S: Store + ?Sized>(store: &S, renderer: &GraphRenderer) -> Result<()> {
    let hierarchy = load_hierarchy(store).await?;
    let graph = HierarchyGraph::build(&hierarchy);
    renderer.render(&graph).await
}
