// ─── Launch Task ───
// Spawns the dedicated server jar with the configured heap bounds and
// arguments, either attached to this terminal or fully detached.

use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

#[cfg(target_os = "windows")]
use std::os::windows::process::CommandExt;

use tokio::io::AsyncWriteExt;
use tokio::process::ChildStdin;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::core::error::{MinemError, MinemResult};
use crate::core::java;
use crate::core::project::Project;

/// How long a server gets to save and exit after `stop` before it is killed.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);
const STDIN_CHANNEL_CAPACITY: usize = 16;

/// Everything needed to start the server process.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Working directory; the jar is resolved relative to it.
    pub server_dir: PathBuf,
    pub server_file: String,
    pub mem_min: String,
    pub mem_max: String,
    pub java_args: Vec<String>,
    pub args: Vec<String>,
    pub java_path: Option<PathBuf>,
    pub detach: bool,
}

impl LaunchOptions {
    pub fn from_project(project: &Project, detach: bool) -> Self {
        let config = &project.config;
        Self {
            server_dir: project.server_dir(),
            server_file: config.server_file.clone(),
            mem_min: config.mem.min.clone(),
            mem_max: config.mem.max.clone(),
            java_args: config.java_args.clone(),
            args: config.args.clone(),
            java_path: config.java_path.as_ref().map(|p| {
                if p.is_absolute() {
                    p.clone()
                } else {
                    project.root.join(p)
                }
            }),
            detach,
        }
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.server_dir.join(&self.server_file)
    }

    /// `-Xmx<max> -Xms<min> <javaArgs..> -jar <file> nogui <args..>`
    pub fn command_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(5 + self.java_args.len() + self.args.len());
        args.push(format!("-Xmx{}", self.mem_max));
        args.push(format!("-Xms{}", self.mem_min));
        args.extend(self.java_args.iter().cloned());
        args.push("-jar".into());
        args.push(self.server_file.clone());
        args.push("nogui".into());
        args.extend(self.args.iter().cloned());
        args
    }
}

/// What happened to the server process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// Attached run finished with this exit code.
    Exited(i32),
    /// Detached child is running on its own.
    Detached { pid: u32 },
}

/// Start the server.
///
/// Attached: stdout is forwarded to ours, our stdin lines are forwarded to
/// the server, and the call resolves with the exit code once the server
/// stops. Ctrl-C / SIGTERM send `stop` to the server and kill it if it is
/// still alive after the grace period.
///
/// Detached: returns right after spawning.
pub async fn launch(options: &LaunchOptions) -> MinemResult<LaunchOutcome> {
    let artifact = options.artifact_path();
    if !artifact.is_file() {
        return Err(MinemError::ArtifactMissing { path: artifact });
    }

    let java_bin = java::resolve_java_binary(options.java_path.as_deref())?;
    let args = options.command_args();

    info!("starting server");
    debug!("Command: {:?} {}", java_bin, args.join(" "));

    if options.detach {
        spawn_detached(&java_bin, &args, &options.server_dir)
    } else {
        run_attached(&java_bin, &args, &options.server_dir).await
    }
}

async fn run_attached(
    java_bin: &Path,
    args: &[String],
    server_dir: &Path,
) -> MinemResult<LaunchOutcome> {
    let mut cmd = tokio::process::Command::new(java_bin);
    cmd.args(args)
        .current_dir(server_dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(|source| MinemError::SpawnFailed { source })?;

    let stdout_task = child.stdout.take().map(|mut out| {
        tokio::spawn(async move {
            let mut parent = tokio::io::stdout();
            let _ = tokio::io::copy(&mut out, &mut parent).await;
            let _ = parent.flush().await;
        })
    });
    let console = child.stdin.take().map(forward_stdin);

    let status = tokio::select! {
        status = child.wait() => status,
        _ = shutdown_signal() => {
            warn!("shutdown requested, stopping server");
            if let Some(console) = &console {
                let _ = console.send("stop".to_string()).await;
            }
            match tokio::time::timeout(SHUTDOWN_GRACE, child.wait()).await {
                Ok(status) => status,
                Err(_) => {
                    warn!("server did not stop within {:?}, killing it", SHUTDOWN_GRACE);
                    let _ = child.kill().await;
                    child.wait().await
                }
            }
        }
    };
    let status = status.map_err(|e| MinemError::io(server_dir, e))?;

    if let Some(task) = stdout_task {
        let _ = task.await;
    }

    let code = exit_code(status);
    info!("server exited with code {}", code);
    Ok(LaunchOutcome::Exited(code))
}

fn spawn_detached(java_bin: &Path, args: &[String], server_dir: &Path) -> MinemResult<LaunchOutcome> {
    let mut cmd = std::process::Command::new(java_bin);
    cmd.args(args)
        .current_dir(server_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    configure_detached_spawn(&mut cmd);

    let child = cmd.spawn().map_err(|source| MinemError::SpawnFailed { source })?;
    let pid = child.id();
    info!("server started in the background (pid {})", pid);
    Ok(LaunchOutcome::Detached { pid })
}

fn configure_detached_spawn(cmd: &mut std::process::Command) {
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        // Own process group: terminal signals aimed at us do not reach it.
        cmd.process_group(0);
    }

    #[cfg(target_os = "windows")]
    {
        const DETACHED_PROCESS: u32 = 0x00000008;
        const CREATE_NEW_PROCESS_GROUP: u32 = 0x00000200;
        cmd.creation_flags(DETACHED_PROCESS | CREATE_NEW_PROCESS_GROUP);
    }
}

/// Forward our stdin to the server console line by line.
///
/// Stdin is read on a dedicated thread; a blocked read never holds up the
/// async side. The returned sender injects console commands of our own.
fn forward_stdin(mut child_stdin: ChildStdin) -> mpsc::Sender<String> {
    let (tx, mut rx) = mpsc::channel::<String>(STDIN_CHANNEL_CAPACITY);

    let reader_tx = tx.clone();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if reader_tx.blocking_send(line).is_err() {
                break;
            }
        }
    });

    tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            let mut payload = line.into_bytes();
            payload.push(b'\n');
            if child_stdin.write_all(&payload).await.is_err() {
                break;
            }
            let _ = child_stdin.flush().await;
        }
    });

    tx
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = ctrl_c() => {}
                    _ = term.recv() => {}
                }
            }
            Err(_) => ctrl_c().await,
        }
    }

    #[cfg(not(unix))]
    ctrl_c().await;
}

async fn ctrl_c() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Exit code of a finished child; death by signal maps to `128 + signal`.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
