/// Background fetching of mesh source text
use std::io::Read;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use wireview_core::{LoadCompletion, LoadError, LoadRequest};

/// Read a mesh reference: `http://` and `https://` URLs over the network,
/// anything else from the filesystem.
pub fn fetch_source(source: &str) -> Result<String, LoadError> {
    if is_url(source) {
        fetch_url(source)
    } else {
        std::fs::read_to_string(source).map_err(|error| LoadError::Read {
            reference: source.to_string(),
            error,
        })
    }
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

fn fetch_url(url: &str) -> Result<String, LoadError> {
    let response = ureq::get(url).call().map_err(|err| match err {
        ureq::Error::Status(status, _) => LoadError::Status {
            reference: url.to_string(),
            status,
        },
        other => LoadError::Transport {
            reference: url.to_string(),
            message: other.to_string(),
        },
    })?;

    let mut text = String::new();
    response
        .into_reader()
        .read_to_string(&mut text)
        .map_err(|error| LoadError::Read {
            reference: url.to_string(),
            error,
        })?;

    log::debug!("downloaded {} bytes from {url}", text.len());
    Ok(text)
}

/// Runs each fetch on its own worker thread and hands the results back over
/// a channel, so the render loop never blocks on I/O and never shares its
/// state with another thread.
pub struct MeshLoader {
    sender: Sender<LoadCompletion>,
    receiver: Receiver<LoadCompletion>,
}

impl MeshLoader {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self { sender, receiver }
    }

    pub fn spawn(&self, request: LoadRequest) {
        let token = request.token;
        let reference = request.source.clone();
        let sender = self.sender.clone();

        let spawned = thread::Builder::new()
            .name("mesh-loader".into())
            .spawn(move || {
                let result = fetch_source(&request.source);
                // The receiver is gone once the app has shut down.
                let _ = sender.send(LoadCompletion::new(&request, result));
            });

        if let Err(err) = spawned {
            log::error!("could not start loader thread for {reference}: {err}");
            let _ = self.sender.send(LoadCompletion {
                token,
                result: Err(LoadError::Transport {
                    reference,
                    message: err.to_string(),
                }),
            });
        }
    }

    /// Completions that have arrived since the last call, without blocking
    pub fn drain(&self) -> impl Iterator<Item = LoadCompletion> + '_ {
        self.receiver.try_iter()
    }

    /// Block until the next completion arrives or `timeout` passes
    pub fn recv_timeout(&self, timeout: Duration) -> Option<LoadCompletion> {
        self.receiver.recv_timeout(timeout).ok()
    }
}

impl Default for MeshLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use wireview_core::{LoadOutcome, Viewer};

    fn temp_obj(name: &str, text: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("wireview-{}-{name}", std::process::id()));
        std::fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_fetch_file() {
        let path = temp_obj("fetch.obj", "v 0 0 0\n");
        let text = fetch_source(path.to_str().unwrap()).unwrap();
        assert_eq!(text, "v 0 0 0\n");
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let err = fetch_source("/definitely/not/here.obj").unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
    }

    #[test]
    fn test_url_detection() {
        assert!(is_url("https://example.com/model.obj"));
        assert!(is_url("http://localhost:8000/a.obj"));
        assert!(!is_url("models/http.obj"));
    }

    #[test]
    fn test_loader_delivers_completions() {
        let path = temp_obj("loader.obj", "v 0 0 0\nv 1 1 1\nf 1 2 1\n");
        let mut viewer = Viewer::default();
        let loader = MeshLoader::new();

        loader.spawn(viewer.request_load(path.to_str().unwrap()));
        let completion = loader.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(
            viewer.complete_load(completion),
            LoadOutcome::Applied {
                vertices: 2,
                faces: 1
            }
        );
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_superseded_load_is_stale() {
        let first = temp_obj("first.obj", "v 0 0 0\n");
        let second = temp_obj("second.obj", "v 0 0 0\nv 1 0 0\n");
        let mut viewer = Viewer::default();
        let loader = MeshLoader::new();

        loader.spawn(viewer.request_load(first.to_str().unwrap()));
        loader.spawn(viewer.request_load(second.to_str().unwrap()));

        let mut outcomes = Vec::new();
        for _ in 0..2 {
            let completion = loader.recv_timeout(Duration::from_secs(5)).unwrap();
            outcomes.push(viewer.complete_load(completion));
        }

        assert!(outcomes.contains(&LoadOutcome::Stale));
        assert_eq!(viewer.mesh().unwrap().vertices.len(), 2);
        std::fs::remove_file(first).unwrap();
        std::fs::remove_file(second).unwrap();
    }
}
