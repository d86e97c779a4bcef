// crates/pixelrts-cli/src/boot.rs
//
// QEMU launcher script. The script re-extracts the container with this CLI and
// boots the payload according to its `type` field.

use std::path::Path;

use pixelrts_core::boot::BootScriptGenerator;
use pixelrts_core::ContainerMetadata;

use crate::io::fields::{KEY_NAME, KEY_TYPE};

#[derive(Clone, Debug)]
pub struct QemuBootScript {
    pub arch: String,
    pub memory: String,
    pub cpu: String,
    /// `None` uses a serial-console default.
    pub kernel_cmdline: Option<String>,
}

impl QemuBootScript {
    fn binary(&self) -> String {
        format!("qemu-system-{}", self.arch)
    }

    fn cmdline(&self) -> String {
        self.kernel_cmdline
            .clone()
            .unwrap_or_else(|| "console=ttyS0 earlyprintk=serial".to_string())
    }
}

impl BootScriptGenerator for QemuBootScript {
    fn name(&self) -> &str {
        "qemu"
    }

    fn generate(&self, container: &Path, meta: &ContainerMetadata) -> pixelrts_core::Result<String> {
        let ext = &meta.extension_fields;
        let content_type = ext.get(KEY_TYPE).map(String::as_str).unwrap_or("binary");
        let name = ext.get(KEY_NAME).map(String::as_str).unwrap_or("data");
        let file_name = container
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut lines = vec![
            "#!/bin/sh".to_string(),
            "# PixelRTS boot script".to_string(),
            format!("# content: {name} ({content_type}), arch: {}", self.arch),
            format!(
                "# payload: {} bytes, {}:{}",
                meta.original_length, meta.hash_algorithm, meta.content_hash
            ),
            "set -eu".to_string(),
            String::new(),
            format!("CONTAINER=\"$(dirname \"$0\")/{}\"", shell_escape_dq(&file_name)),
            "PAYLOAD=\"${TMPDIR:-/tmp}/pixelrts_$$.bin\"".to_string(),
            format!("QEMU_BINARY=\"{}\"", self.binary()),
            format!("QEMU_MEMORY=\"{}\"", shell_escape_dq(&self.memory)),
            format!("QEMU_CPU=\"{}\"", shell_escape_dq(&self.cpu)),
            String::new(),
            "pixelrts extract \"$CONTAINER\" -o \"$PAYLOAD\" --verify".to_string(),
            String::new(),
        ];

        let launch = |drive: &str| {
            vec![
                "exec \"$QEMU_BINARY\" \\".to_string(),
                "    -m \"$QEMU_MEMORY\" \\".to_string(),
                "    -cpu \"$QEMU_CPU\" \\".to_string(),
                format!("    {drive} \\"),
            ]
        };
        match content_type {
            "kernel" => {
                lines.extend(launch("-kernel \"$PAYLOAD\""));
                let cmdline = self.cmdline();
                if !cmdline.is_empty() {
                    lines.push(format!("    -append \"{}\" \\", shell_escape_dq(&cmdline)));
                }
                lines.push("    -nographic \\".to_string());
                lines.push("    -monitor none".to_string());
            }
            "os" => {
                lines.extend(launch("-drive \"file=$PAYLOAD,format=raw\""));
                lines.push("    -nographic".to_string());
            }
            _ => {
                lines.push(format!(
                    "echo \"content type '{content_type}' is not directly bootable\""
                ));
                lines.push("echo \"payload extracted to $PAYLOAD\"".to_string());
            }
        }
        lines.push(String::new());
        Ok(lines.join("\n"))
    }
}

fn shell_escape_dq(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
