use std::path::Path;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::set_status::SetStatus;

/// Frontend assets; `/` serves `index.html`, unknown paths get `index.html`
/// with a 404 status
pub fn frontend_service(root: impl AsRef<Path>) -> ServeDir<SetStatus<ServeFile>> {
    let root = root.as_ref();
    let index = root.join("index.html");
    ServeDir::new(root).not_found_service(ServeFile::new(index))
}

/// Raw bytes of uploaded files, content type guessed from the extension
pub fn uploads_service(upload_dir: impl AsRef<Path>) -> ServeDir {
    ServeDir::new(upload_dir).append_index_html_on_directories(false)
}
