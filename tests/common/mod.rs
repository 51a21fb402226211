// Common test utilities and fixtures

pub mod helpers;

// Re-export commonly used items
// Note: These may appear unused in one test binary but are used in another
#[allow(unused_imports)]
pub use fixtures::TestTree;
#[allow(unused_imports)]
pub use helpers::{create_test_services, index_tree, test_config, MockEmbedder};
