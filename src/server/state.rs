use crate::catalog::CatalogClient;

#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogClient,
}
