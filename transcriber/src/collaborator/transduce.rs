use crate::collaborator::process::LineChannel;
use crate::collaborator::{CancellationToken, ProcessConfig, Transducer};
use crate::errors::{CollaboratorError, Result};

/// `transduce` プロセスによる有限状態トランスデューサー
pub struct FstTransducer {
    channel: LineChannel,
}

impl FstTransducer {
    /// 変換プロセスを起動します。
    ///
    /// # エラー
    ///
    /// プロセスを起動できない場合にエラーを返します。
    pub fn spawn(config: &ProcessConfig, cancel: CancellationToken) -> Result<Self> {
        Ok(Self {
            channel: LineChannel::spawn(config, cancel)?,
        })
    }
}

impl Transducer for FstTransducer {
    fn transduce(&mut self, line: &str) -> Result<Option<String>, CollaboratorError> {
        let response = self.channel.request(line)?;
        Ok((!response.is_empty()).then_some(response))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_transducer_process() {
        let mut fst = FstTransducer::spawn(&ProcessConfig::new("cat"), CancellationToken::new()).unwrap();
        assert_eq!(fst.transduce("д+ом SIL").unwrap(), Some("д+ом SIL".to_string()));
        assert_eq!(fst.transduce("").unwrap(), None);
    }
}
