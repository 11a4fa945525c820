use crate::models::form::ReportForm;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从 TOML 文件加载一份表单
pub async fn load_form(toml_file_path: &Path) -> Result<ReportForm> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取TOML文件: {}", toml_file_path.display()))?;

    let mut form: ReportForm = toml::from_str(&content)
        .with_context(|| format!("无法解析TOML文件: {}", toml_file_path.display()))?;

    // 照片相对路径以表单文件所在目录为基准
    if let (Some(photo), Some(dir)) = (form.photo.as_ref(), toml_file_path.parent()) {
        if photo.is_relative() {
            form.photo = Some(dir.join(photo));
        }
    }

    // 设置文件路径
    form.file_path = Some(toml_file_path.to_string_lossy().to_string());

    Ok(form)
}

/// 从文件夹中加载所有 TOML 表单，按文件名排序
///
/// 无法解析的文件记录警告后跳过。
pub async fn load_all_forms(folder_path: &str) -> Result<Vec<ReportForm>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut toml_files = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml_files.push(path);
        }
    }
    toml_files.sort();

    let mut forms = Vec::with_capacity(toml_files.len());
    for path in toml_files {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_form(&path).await {
            Ok(form) => forms.push(form),
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {:#}", path.display(), e);
            }
        }
    }

    Ok(forms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_all_forms_skips_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("b.toml"),
            "student_name = \"Sara\"\nphoto = \"sara.png\"\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("a.toml"), "student_name = \"Ali\"\n").unwrap();
        std::fs::write(dir.path().join("broken.toml"), "student_name = [").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let forms = load_all_forms(dir.path().to_str().unwrap()).await.unwrap();

        assert_eq!(forms.len(), 2);
        assert_eq!(forms[0].student_name, "Ali");
        assert_eq!(forms[1].student_name, "Sara");
        assert_eq!(forms[1].photo.as_deref(), Some(dir.path().join("sara.png").as_path()));
        assert!(forms[0].file_path.as_deref().unwrap().ends_with("a.toml"));
    }

    #[tokio::test]
    async fn test_missing_folder_is_an_error() {
        assert!(load_all_forms("/definitely/not/here").await.is_err());
    }
}
