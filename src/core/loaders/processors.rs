// ─── Forge Processor Stage ───
// Turns the processors of a Forge-like `install_profile.json` into fully
// resolved tasks on the merged manifest. Paths stay symbolic so the shell
// can substitute its own layout:
//   ${library_directory}  ${root_directory}  ${minecraft_jar}
//   ${installer}          ${installer_data}

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use super::installer::ManifestStage;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::manifest::{LaunchManifest, ProcessorTask};
use crate::core::maven::MavenArtifact;

/// Subset of a Forge-like `install_profile.json`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallProfile {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub minecraft: Option<String>,
    #[serde(default)]
    pub processors: Vec<ProcessorSpec>,
    #[serde(default)]
    pub data: BTreeMap<String, DataEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DataEntry {
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub server: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProcessorSpec {
    #[serde(default)]
    pub sides: Option<Vec<String>>,
    pub jar: String,
    #[serde(default)]
    pub classpath: Vec<String>,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub outputs: BTreeMap<String, String>,
}

impl ProcessorSpec {
    fn runs_on_client(&self) -> bool {
        self.sides
            .as_ref()
            .map_or(true, |sides| sides.iter().any(|s| s == "client"))
    }
}

fn library_placeholder(coord: &str) -> LauncherResult<String> {
    let artifact = MavenArtifact::parse(coord)?;
    Ok(format!("${{library_directory}}/{}", artifact.repository_path()))
}

/// Data values: `[coord]` is an artifact, `'text'` a literal, `/path` a file
/// inside the installer archive.
fn resolve_data_value(raw: &str) -> LauncherResult<String> {
    if let Some(coord) = raw.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        return library_placeholder(coord);
    }
    if let Some(literal) = raw.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
        return Ok(literal.to_string());
    }
    if raw.starts_with('/') {
        return Ok(format!("${{installer_data}}{}", raw));
    }
    Ok(raw.to_string())
}

/// `{NAME}` left behind after substitution. `${...}` placeholders are ours.
fn has_unresolved_variable(value: &str) -> bool {
    let mut prev = None;
    for (i, c) in value.char_indices() {
        if c == '{' && prev != Some('$') && value[i..].contains('}') {
            return true;
        }
        prev = Some(c);
    }
    false
}

pub struct ProcessorStage {
    processors: Vec<ProcessorSpec>,
    variables: HashMap<String, String>,
}

impl ProcessorStage {
    pub fn new(profile: InstallProfile, minecraft_version: &str) -> LauncherResult<Self> {
        let mut variables = HashMap::new();
        for (key, entry) in &profile.data {
            if let Some(client) = &entry.client {
                variables.insert(key.clone(), resolve_data_value(client)?);
            }
        }

        for (key, value) in [
            ("SIDE", "client".to_string()),
            ("MINECRAFT_VERSION", minecraft_version.to_string()),
            ("ROOT", "${root_directory}".to_string()),
            ("LIBRARY_DIR", "${library_directory}".to_string()),
            ("MINECRAFT_JAR", "${minecraft_jar}".to_string()),
            ("INSTALLER", "${installer}".to_string()),
        ] {
            variables.insert(key.to_string(), value);
        }

        Ok(Self {
            processors: profile.processors,
            variables,
        })
    }

    fn resolve(&self, raw: &str) -> LauncherResult<String> {
        let mut out = raw.to_string();
        for (key, value) in &self.variables {
            out = out.replace(&format!("{{{}}}", key), value);
        }

        if let Some(coord) = out.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            return library_placeholder(coord);
        }

        if has_unresolved_variable(&out) {
            return Err(LauncherError::Fetch(format!(
                "unresolved processor variable in '{}'",
                raw
            )));
        }

        Ok(out)
    }

    pub fn tasks(&self) -> LauncherResult<Vec<ProcessorTask>> {
        self.processors
            .iter()
            .filter(|p| p.runs_on_client())
            .map(|p| {
                let args = p
                    .args
                    .iter()
                    .map(|arg| self.resolve(arg))
                    .collect::<LauncherResult<Vec<_>>>()?;
                let outputs = p
                    .outputs
                    .iter()
                    .map(|(k, v)| Ok((self.resolve(k)?, self.resolve(v)?)))
                    .collect::<LauncherResult<BTreeMap<_, _>>>()?;
                Ok(ProcessorTask {
                    jar: p.jar.clone(),
                    classpath: p.classpath.clone(),
                    args,
                    outputs,
                })
            })
            .collect()
    }
}

impl ManifestStage for ProcessorStage {
    fn apply(&self, mut manifest: LaunchManifest) -> LauncherResult<LaunchManifest> {
        manifest.processors.extend(self.tasks()?);
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> InstallProfile {
        serde_json::from_value(serde_json::json!({
            "version": "1.20.1-forge-47.2.0",
            "minecraft": "1.20.1",
            "data": {
                "MAPPINGS": {
                    "client": "[de.oceanlabs.mcp:mcp_config:1.20.1-20230612.114412:mappings@txt]",
                    "server": "[de.oceanlabs.mcp:mcp_config:1.20.1-20230612.114412:mappings-server@txt]"
                },
                "BINPATCH": {"client": "/data/client.lzma", "server": "/data/server.lzma"},
                "MC_SLIM_SHA": {"client": "'abc123'", "server": "'def456'"}
            },
            "processors": [
                {
                    "sides": ["server"],
                    "jar": "net.minecraftforge:installertools:1.3.0",
                    "args": ["--task", "EXTRACT_SERVER"]
                },
                {
                    "jar": "net.minecraftforge:binarypatcher:1.1.1:fatjar",
                    "classpath": ["net.sf.jopt-simple:jopt-simple:5.0.4"],
                    "args": ["--clean", "{MINECRAFT_JAR}", "--apply", "{BINPATCH}", "--map", "{MAPPINGS}", "--side", "{SIDE}"],
                    "outputs": {"{MINECRAFT_JAR}": "{MC_SLIM_SHA}"}
                },
                {
                    "sides": ["client"],
                    "jar": "net.minecraftforge:jarsplitter:1.1.4",
                    "args": ["--input", "[net.minecraft:client:1.20.1]"]
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn client_processors_are_resolved() {
        let stage = ProcessorStage::new(profile(), "1.20.1").unwrap();
        let tasks = stage.tasks().unwrap();
        assert_eq!(tasks.len(), 2);

        let patcher = &tasks[0];
        assert_eq!(patcher.jar, "net.minecraftforge:binarypatcher:1.1.1:fatjar");
        assert_eq!(
            patcher.args,
            vec![
                "--clean",
                "${minecraft_jar}",
                "--apply",
                "${installer_data}/data/client.lzma",
                "--map",
                "${library_directory}/de/oceanlabs/mcp/mcp_config/1.20.1-20230612.114412/mcp_config-1.20.1-20230612.114412-mappings.txt",
                "--side",
                "client",
            ]
        );
        assert_eq!(patcher.outputs.get("${minecraft_jar}").map(String::as_str), Some("abc123"));

        assert_eq!(
            tasks[1].args[1],
            "${library_directory}/net/minecraft/client/1.20.1/client-1.20.1.jar"
        );
    }

    #[test]
    fn stage_appends_tasks_to_manifest() {
        let stage = ProcessorStage::new(profile(), "1.20.1").unwrap();
        let manifest = stage.apply(LaunchManifest::default()).unwrap();
        assert_eq!(manifest.processors.len(), 2);
    }

    #[test]
    fn unknown_variables_fail() {
        let profile: InstallProfile = serde_json::from_value(serde_json::json!({
            "processors": [{"jar": "a:b:1", "args": ["{NOT_DEFINED}"]}]
        }))
        .unwrap();
        let stage = ProcessorStage::new(profile, "1.20.1").unwrap();
        assert!(stage.tasks().is_err());
    }
}
