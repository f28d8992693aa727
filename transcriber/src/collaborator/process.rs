//! 行単位で要求と応答をやり取りする外部プロセス

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use crate::collaborator::{CancellationToken, ProcessConfig};
use crate::errors::{CollaboratorError, Result, TranscriberError};

/// キャンセルを確認する間隔
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// 外部プロセスとの行チャネル
///
/// 標準出力は専用のスレッドで読み取られ、応答待ちは制限時間とキャンセルを
/// 監視しながら行われます。制限時間を過ぎた要求への応答は、後から届いても
/// 次の要求の応答と取り違えないように読み捨てられます。
///
/// チャネルが破棄されるとプロセスは終了させられます。
pub struct LineChannel {
    name: String,
    child: Child,
    stdin: Option<ChildStdin>,
    responses: Receiver<std::io::Result<String>>,
    timeout: Duration,
    cancel: CancellationToken,
    stale: usize,
}

impl LineChannel {
    /// プロセスを起動します。
    ///
    /// # 引数
    ///
    /// * `config` - 起動設定
    /// * `cancel` - 要求を取り消すためのトークン
    ///
    /// # エラー
    ///
    /// プロセスを起動できない場合に [`CollaboratorError::Spawn`] を返します。
    pub fn spawn(config: &ProcessConfig, cancel: CancellationToken) -> Result<Self> {
        let name = config.program().to_string();
        let mut child = Command::new(config.program())
            .args(config.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| CollaboratorError::Spawn {
                program: name.clone(),
                source,
            })?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            let _ = child.kill();
            return Err(TranscriberError::invalid_state(
                format!("cannot talk to '{name}'"),
                "standard streams are not piped",
            ));
        };

        let (tx, responses) = mpsc::channel();
        thread::Builder::new()
            .name(format!("{name}-reader"))
            .spawn(move || {
                for line in BufReader::new(stdout).lines() {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
            })?;

        log::info!("Started '{name}' (pid {})", child.id());
        Ok(Self {
            name,
            child,
            stdin: Some(stdin),
            responses,
            timeout: config.get_timeout(),
            cancel,
            stale: 0,
        })
    }

    /// プロセスの名前
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 1行を送り、1行の応答を待ちます。
    ///
    /// 応答の前後の空白は取り除かれます。
    ///
    /// # エラー
    ///
    /// 制限時間を過ぎた場合は [`CollaboratorError::Timeout`]、プロセスが出力を閉じた場合は
    /// [`CollaboratorError::UnexpectedEof`]、キャンセルされた場合は
    /// [`CollaboratorError::Cancelled`] を返します。
    pub fn request(&mut self, line: &str) -> Result<String, CollaboratorError> {
        if self.cancel.is_cancelled() {
            return Err(CollaboratorError::Cancelled {
                name: self.name.clone(),
            });
        }
        self.send(line)?;

        let deadline = Instant::now() + self.timeout;
        loop {
            if self.cancel.is_cancelled() {
                self.stale += 1;
                return Err(CollaboratorError::Cancelled {
                    name: self.name.clone(),
                });
            }
            let now = Instant::now();
            if now >= deadline {
                self.stale += 1;
                log::warn!("'{}' did not answer within {:?}", self.name, self.timeout);
                return Err(CollaboratorError::Timeout {
                    name: self.name.clone(),
                    timeout: self.timeout,
                });
            }
            match self.responses.recv_timeout(POLL_INTERVAL.min(deadline - now)) {
                Ok(_) if self.stale > 0 => {
                    self.stale -= 1;
                    log::debug!("discarded a late response from '{}'", self.name);
                }
                Ok(Ok(response)) => return Ok(response.trim().to_string()),
                Ok(Err(source)) => {
                    return Err(CollaboratorError::Io {
                        name: self.name.clone(),
                        source,
                    });
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    log::error!("'{}' closed its output", self.name);
                    return Err(CollaboratorError::UnexpectedEof {
                        name: self.name.clone(),
                    });
                }
            }
        }
    }

    fn send(&mut self, line: &str) -> Result<(), CollaboratorError> {
        let Some(stdin) = self.stdin.as_mut() else {
            return Err(CollaboratorError::UnexpectedEof {
                name: self.name.clone(),
            });
        };
        writeln!(stdin, "{line}")
            .and_then(|_| stdin.flush())
            .map_err(|source| CollaboratorError::Io {
                name: self.name.clone(),
                source,
            })
    }
}

impl Drop for LineChannel {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Err(e) = self.child.kill() {
            log::debug!("could not terminate '{}': {e}", self.name);
        }
        let _ = self.child.wait();
    }
}
