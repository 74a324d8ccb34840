use once_cell::sync::OnceCell;
use std::future::Future;
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;

static RUNTIME: OnceCell<Runtime> = OnceCell::new();

/// Background runtime for network calls; the UI thread never blocks on it.
pub fn runtime() -> std::io::Result<&'static Runtime> {
    RUNTIME.get_or_try_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("clinic-dashboard-io")
            .build()
    })
}

pub fn spawn_async<F>(fut: F) -> std::io::Result<JoinHandle<F::Output>>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    Ok(runtime()?.spawn(fut))
}

pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_explicit_scheme() {
        assert_eq!(normalize_url(" http://localhost:3000 "), "http://localhost:3000");
    }

    #[test]
    fn defaults_to_https() {
        assert_eq!(normalize_url("api.clinic.com"), "https://api.clinic.com");
    }

    #[test]
    fn spawned_work_completes() {
        let handle = spawn_async(async { 2 + 2 }).unwrap();
        assert_eq!(runtime().unwrap().block_on(handle).unwrap(), 4);
    }
}
