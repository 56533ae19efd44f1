use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

use crate::{GenerationParams, Generator};

/// Runs llama.cpp's `llama-cli` once per prompt and returns its stdout.
#[derive(Debug, Clone)]
pub struct LlamaCliGenerator {
    bin: PathBuf,
    model: PathBuf,
}

impl LlamaCliGenerator {
    pub fn new(bin: impl Into<PathBuf>, model: impl Into<PathBuf>) -> Self {
        Self { bin: bin.into(), model: model.into() }
    }

    pub fn bin(&self) -> &Path {
        &self.bin
    }

    pub fn command(&self, prompt: &str, params: &GenerationParams) -> Command {
        let mut cmd = Command::new(&self.bin);
        cmd.arg("--model")
            .arg(&self.model)
            .arg("--prompt")
            .arg(prompt)
            .arg("--n_predict")
            .arg(params.max_tokens.to_string())
            .arg("--temp")
            .arg(params.temperature.to_string())
            .arg("--top_p")
            .arg(params.top_p.to_string())
            .arg("--threads")
            .arg(params.threads.to_string());
        cmd
    }
}

impl Generator for LlamaCliGenerator {
    fn name(&self) -> &str {
        "llama-cli"
    }

    fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String> {
        info!(bin = %self.bin.display(), model = %self.model.display(), max_tokens = params.max_tokens, "invoking llama-cli");
        let output = self
            .command(prompt, params)
            .output()
            .with_context(|| format!("failed to launch {}", self.bin.display()))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("{} exited with {}: {}", self.bin.display(), output.status, stderr.trim());
        }
        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!(chars = text.len(), "generation finished");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_carries_sampling_flags() {
        let generator = LlamaCliGenerator::new("llama-cli", "models/llama.gguf");
        let params = GenerationParams { temperature: 0.5, top_p: 0.9, max_tokens: 128, threads: 4 };
        let cmd = generator.command("say hi", &params);
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            args,
            [
                "--model", "models/llama.gguf", "--prompt", "say hi", "--n_predict", "128", "--temp", "0.5", "--top_p",
                "0.9", "--threads", "4"
            ]
        );
    }
}
