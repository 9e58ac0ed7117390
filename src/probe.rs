use std::process::Command;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use anyhow::{Context as AnyhowCtx, Result};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender, TryRecvError, TrySendError};

/// `Ok(None)` means there is no foreground window, which is not a fault.
pub trait ForegroundProbe {
    fn foreground_title(&mut self) -> Result<Option<String>>;

    fn refresh(&mut self) {}
}

#[cfg(target_os = "windows")]
const WINDOWS_TITLE_SCRIPT: &str = r#"Add-Type @"
using System;
using System.Text;
using System.Runtime.InteropServices;
public class Fg {
  [DllImport("user32.dll")] public static extern IntPtr GetForegroundWindow();
  [DllImport("user32.dll")] public static extern int GetWindowText(IntPtr h, StringBuilder s, int n);
}
"@
$b = New-Object System.Text.StringBuilder 512
[void][Fg]::GetWindowText([Fg]::GetForegroundWindow(), $b, 512)
$b.ToString()"#;

#[derive(Debug, Clone)]
pub struct CommandProbe { program: String, args: Vec<String> }
impl CommandProbe {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self { program: program.into(), args: args.iter().map(|a| a.to_string()).collect() }
    }

    #[cfg(target_os = "linux")]
    pub fn native() -> Self {
        Self::new("xdotool", &["getactivewindow", "getwindowname"])
    }

    #[cfg(target_os = "macos")]
    pub fn native() -> Self {
        Self::new("osascript", &["-e", "tell application \"System Events\" to get name of first window of (first application process whose frontmost is true)"])
    }

    #[cfg(target_os = "windows")]
    pub fn native() -> Self {
        Self::new("powershell", &["-NoProfile", "-NonInteractive", "-Command", WINDOWS_TITLE_SCRIPT])
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    pub fn native() -> Self {
        Self::new("xdotool", &["getactivewindow", "getwindowname"])
    }
}
impl ForegroundProbe for CommandProbe {
    fn foreground_title(&mut self) -> Result<Option<String>> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .with_context(|| format!("running {}", self.program))?;
        if !output.status.success() { return Ok(None); }
        let title = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(if title.is_empty() { None } else { Some(title) })
    }
}

type Sample = (u64, Result<Option<String>>);

pub struct ProbeWorker {
    request_tx: Sender<()>,
    result_rx:  Receiver<Sample>,
    generation: Arc<AtomicU64>,
    latest:     Option<String>,
}
impl ProbeWorker {
    pub fn spawn<P: ForegroundProbe + Send + 'static>(mut probe: P) -> Self {
        let (request_tx, request_rx) = bounded::<()>(1);
        let (result_tx, result_rx) = unbounded();
        let generation = Arc::new(AtomicU64::new(0));
        let worker_generation = generation.clone();
        thread::spawn(move || {
            for () in request_rx.iter() {
                // Samples are stamped with the generation current when the query started.
                let stamp = worker_generation.load(Ordering::Acquire);
                if result_tx.send((stamp, probe.foreground_title())).is_err() { break; }
            }
        });
        let _ = request_tx.try_send(());
        Self { request_tx, result_rx, generation, latest: None }
    }

    fn request(&self) -> Result<()> {
        match self.request_tx.try_send(()) {
            Ok(()) | Err(TrySendError::Full(())) => Ok(()),
            Err(TrySendError::Disconnected(())) => anyhow::bail!("probe worker stopped"),
        }
    }
}
impl ForegroundProbe for ProbeWorker {
    fn foreground_title(&mut self) -> Result<Option<String>> {
        let current = self.generation.load(Ordering::Acquire);
        let mut failure = None;
        loop {
            match self.result_rx.try_recv() {
                Ok((stamp, _)) if stamp < current => {}
                Ok((_, Ok(title))) => { self.latest = title; failure = None; }
                Ok((_, Err(e)))    => { self.latest = None; failure = Some(e); }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => anyhow::bail!("probe worker stopped"),
            }
        }
        self.request()?;
        match failure {
            Some(e) => Err(e),
            None    => Ok(self.latest.clone()),
        }
    }

    fn refresh(&mut self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.latest = None;
        while self.result_rx.try_recv().is_ok() {}
        if let Err(e) = self.request() {
            log::debug!("could not refresh foreground window: {e:#}");
        }
    }
}
