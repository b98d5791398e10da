//! Developer-operations plugin.

use async_trait::async_trait;
use std::sync::Arc;

use super::read_data_file;
use crate::invocation::{Arguments, OperationId};
use crate::tool::{Plugin, Tool, ToolContext, ToolDefinition, ToolError};

pub const NAMESPACE: &str = "DevopsPlugin";

const BUILD_LOG: &str = "build.log";

pub struct DevopsPlugin;

impl Plugin for DevopsPlugin {
    fn name(&self) -> &'static str {
        NAMESPACE
    }

    fn functions(&self) -> Vec<Arc<dyn Tool>> {
        DevopsFunction::ALL
            .iter()
            .map(|f| Arc::new(*f) as Arc<dyn Tool>)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevopsFunction {
    DeployToStage,
    DeployToProd,
    CreateNewBranch,
    ReadLogFile,
}

impl DevopsFunction {
    pub const ALL: &'static [DevopsFunction] = &[
        DevopsFunction::DeployToStage,
        DevopsFunction::DeployToProd,
        DevopsFunction::CreateNewBranch,
        DevopsFunction::ReadLogFile,
    ];

    fn operation_name(self) -> &'static str {
        match self {
            Self::DeployToStage => "DeployToStage",
            Self::DeployToProd => "DeployToProd",
            Self::CreateNewBranch => "CreateNewBranch",
            Self::ReadLogFile => "ReadLogFile",
        }
    }
}

#[async_trait]
impl Tool for DevopsFunction {
    fn definition(&self) -> ToolDefinition {
        let id = OperationId::new(NAMESPACE, self.operation_name());
        match self {
            Self::DeployToStage => {
                ToolDefinition::without_parameters(id, "Deploy the site to the staging environment.")
            }
            Self::DeployToProd => {
                ToolDefinition::without_parameters(id, "Deploy the site to the production environment.")
            }
            Self::CreateNewBranch => ToolDefinition::new(
                id,
                "Create a new git branch from an existing base branch.",
                serde_json::json!({
                    "type": "object",
                    "properties": {
                        "branchName": {
                            "type": "string",
                            "description": "Name of the branch to create"
                        },
                        "baseBranch": {
                            "type": "string",
                            "description": "Branch to create it from"
                        }
                    },
                    "required": ["branchName", "baseBranch"]
                }),
            ),
            Self::ReadLogFile => {
                ToolDefinition::without_parameters(id, "Read the most recent build log.")
            }
        }
    }

    async fn execute(&self, args: &Arguments, context: &ToolContext) -> Result<String, ToolError> {
        match self {
            Self::DeployToStage => Ok("Staging site deployed successfully.".to_string()),
            Self::DeployToProd => Ok("Production site deployed successfully.".to_string()),
            Self::CreateNewBranch => {
                let branch = args.required_str("branchName")?;
                let base = args.required_str("baseBranch")?;
                Ok(format!("Created new branch `{}` from `{}`", branch, base))
            }
            Self::ReadLogFile => read_data_file(context, BUILD_LOG).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx(dir: &std::path::Path) -> ToolContext {
        ToolContext {
            working_directory: dir.to_path_buf(),
        }
    }

    #[tokio::test]
    async fn test_deployments() {
        let c = ctx(std::path::Path::new("/tmp"));
        let none = Arguments::default();
        assert_eq!(
            DevopsFunction::DeployToStage.execute(&none, &c).await.unwrap(),
            "Staging site deployed successfully."
        );
        assert_eq!(
            DevopsFunction::DeployToProd.execute(&none, &c).await.unwrap(),
            "Production site deployed successfully."
        );
    }

    #[tokio::test]
    async fn test_create_new_branch() {
        let c = ctx(std::path::Path::new("/tmp"));
        let args = Arguments::from_value(json!({"branchName": "feature-login", "baseBranch": "main"}));
        assert_eq!(
            DevopsFunction::CreateNewBranch.execute(&args, &c).await.unwrap(),
            "Created new branch `feature-login` from `main`"
        );
    }

    #[tokio::test]
    async fn test_create_new_branch_requires_base() {
        let c = ctx(std::path::Path::new("/tmp"));
        let args = Arguments::from_value(json!({"branchName": "feature-login"}));
        let err = DevopsFunction::CreateNewBranch
            .execute(&args, &c)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_read_log_file() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join(BUILD_LOG), "Build succeeded\n")
            .await
            .unwrap();

        let content = DevopsFunction::ReadLogFile
            .execute(&Arguments::default(), &ctx(dir.path()))
            .await
            .unwrap();
        assert_eq!(content, "Build succeeded\n");
    }

    #[tokio::test]
    async fn test_read_log_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = DevopsFunction::ReadLogFile
            .execute(&Arguments::default(), &ctx(dir.path()))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::ExecutionFailed(_)));
    }

    #[test]
    fn test_plugin_functions() {
        let names: Vec<String> = DevopsPlugin
            .functions()
            .iter()
            .map(|f| f.definition().name())
            .collect();
        assert_eq!(
            names,
            vec![
                "DevopsPlugin-DeployToStage",
                "DevopsPlugin-DeployToProd",
                "DevopsPlugin-CreateNewBranch",
                "DevopsPlugin-ReadLogFile",
            ]
        );
    }
}
