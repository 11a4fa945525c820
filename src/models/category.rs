//! 计分类别与启用集合

use serde::{Deserialize, Serialize};

/// 计分类别（每项满分 100）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Test,
    Assignment,
    Behaviour,
    Presentation,
    Participation,
}

impl Category {
    /// 规范顺序，预览表格按此顺序输出
    pub const ALL: [Category; 5] = [
        Category::Test,
        Category::Assignment,
        Category::Behaviour,
        Category::Presentation,
        Category::Participation,
    ];

    /// 字段名（表单/TOML 中使用）
    pub fn name(self) -> &'static str {
        match self {
            Category::Test => "test",
            Category::Assignment => "assignment",
            Category::Behaviour => "behaviour",
            Category::Presentation => "presentation",
            Category::Participation => "participation",
        }
    }

    /// 首字母大写的显示名
    pub fn label(self) -> &'static str {
        match self {
            Category::Test => "Test",
            Category::Assignment => "Assignment",
            Category::Behaviour => "Behaviour",
            Category::Presentation => "Presentation",
            Category::Participation => "Participation",
        }
    }

    /// 从字段名解析
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 启用的计分类别集合
///
/// 只有启用的类别参与总分/百分比计算，并出现在成绩表中。
/// 默认全部启用。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveFieldSet {
    flags: [bool; 5],
}

impl Default for ActiveFieldSet {
    fn default() -> Self {
        Self { flags: [true; 5] }
    }
}

impl ActiveFieldSet {
    /// 全部禁用的集合
    pub fn none() -> Self {
        Self { flags: [false; 5] }
    }

    pub fn is_active(&self, category: Category) -> bool {
        self.flags[category.index()]
    }

    pub fn set(&mut self, category: Category, active: bool) {
        self.flags[category.index()] = active;
    }

    /// 翻转一个类别，返回翻转后的状态
    pub fn toggle(&mut self, category: Category) -> bool {
        let flag = &mut self.flags[category.index()];
        *flag = !*flag;
        *flag
    }

    /// 按规范顺序遍历启用的类别
    pub fn active(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL
            .into_iter()
            .filter(move |c| self.is_active(*c))
    }

    pub fn active_count(&self) -> usize {
        self.flags.iter().filter(|f| **f).count()
    }
}
