use crate::layout::build_render_model;
use crate::rendering::{render, OutputFormat, Rendered, Theme};
use crate::{Canvas, Error, Result};
use chrono::NaiveDateTime;
use futures::future::join_all;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use tokio::sync::oneshot;

/// Inputs for one render job.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub now: NaiveDateTime,
    pub canvas: Canvas,
    pub format: OutputFormat,
    pub theme: Theme,
}

impl RenderRequest {
    pub fn new(now: NaiveDateTime, canvas: Canvas, format: OutputFormat) -> Self {
        Self { now, canvas, format, theme: Theme::default() }
    }

    fn run(&self) -> Result<Rendered> {
        let model = build_render_model(self.now, self.canvas.width as f64, self.canvas.height as f64)?;
        render(&model, &self.theme, self.format)
    }
}

enum Command {
    Render(RenderRequest, oneshot::Sender<Result<Rendered>>),
    Shutdown,
}

/// An async-friendly renderer backed by a pool of worker threads.
///
/// Encoding a large PNG is CPU bound, so jobs run on dedicated threads and
/// callers await the reply without blocking their executor. Jobs share no
/// state; workers only share the job queue.
#[derive(Clone)]
pub struct AsyncRenderer {
    cmd_tx: Sender<Command>,
    workers: usize,
}

fn worker_loop(id: usize, cmd_rx: Arc<Mutex<Receiver<Command>>>) {
    loop {
        // Hold the lock only while receiving
        let cmd = match cmd_rx.lock() {
            Ok(rx) => rx.recv(),
            Err(_) => break,
        };
        match cmd {
            Ok(Command::Render(req, resp)) => {
                log::debug!("worker {id} rendering {} {}x{}", req.format, req.canvas.width, req.canvas.height);
                let _ = resp.send(req.run());
            }
            Ok(Command::Shutdown) | Err(_) => break,
        }
    }
    log::debug!("render worker {id} stopped");
}

impl AsyncRenderer {
    /// Spawn `workers` background threads (at least one).
    pub fn new(workers: usize) -> Result<Self> {
        let workers = workers.max(1);
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        let cmd_rx = Arc::new(Mutex::new(cmd_rx));

        for id in 0..workers {
            let rx = Arc::clone(&cmd_rx);
            thread::Builder::new()
                .name(format!("yeardots-render-{id}"))
                .spawn(move || worker_loop(id, rx))
                .map_err(|e| Error::Other(format!("Failed to spawn render worker: {}", e)))?;
        }

        Ok(Self { cmd_tx, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Render one request on the pool.
    pub async fn render(&self, request: RenderRequest) -> Result<Rendered> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Render(request, tx))
            .map_err(|_| Error::Other("Renderer has shut down".into()))?;
        rx.await
            .map_err(|e| Error::Other(format!("Render canceled: {}", e)))?
    }

    /// Render several requests concurrently; results keep the input order.
    pub async fn render_many(&self, requests: Vec<RenderRequest>) -> Vec<Result<Rendered>> {
        join_all(requests.into_iter().map(|r| self.render(r))).await
    }

    /// Stop every worker. Jobs already queued ahead of the stop signals still run.
    pub fn shutdown(self) {
        for _ in 0..self.workers {
            let _ = self.cmd_tx.send(Command::Shutdown);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn request(format: OutputFormat) -> RenderRequest {
        let now = NaiveDate::from_ymd_opt(2025, 9, 9).unwrap().and_hms_opt(0, 0, 0).unwrap();
        RenderRequest::new(now, Canvas::default(), format)
    }

    #[tokio::test]
    async fn renders_on_worker() {
        let renderer = AsyncRenderer::new(2).unwrap();
        let out = renderer.render(request(OutputFormat::Svg)).await.unwrap();
        assert_eq!(out.format, OutputFormat::Svg);
        assert!(String::from_utf8(out.body).unwrap().contains("<svg"));
        renderer.shutdown();
    }

    #[tokio::test]
    async fn invalid_canvas_is_reported() {
        let renderer = AsyncRenderer::new(1).unwrap();
        let mut req = request(OutputFormat::Json);
        req.canvas = Canvas { width: 0, height: 844 };
        let err = renderer.render(req).await.unwrap_err();
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn render_after_shutdown_fails() {
        let renderer = AsyncRenderer::new(1).unwrap();
        let handle = renderer.clone();
        renderer.shutdown();
        // Queued behind the stop signal, so the job is dropped unrun
        assert!(handle.render(request(OutputFormat::Json)).await.is_err());
    }
}
