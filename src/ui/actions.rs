//! Action 枚举定义 (Intent)
//!
//! 用户交互转化为明确的语义化 Action

/// 用户操作枚举
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    FocusNext,
    FocusPrev,
    MoveSelectionUp,
    MoveSelectionDown,

    // 触发特定功能
    Activate,
    AddSection,
    StartDeleteSection,
    StartDrag,
    Save,
    StartReset,

    // 表单/通用交互
    Cancel,      // Esc / n
    Submit,      // Enter / y / m
    Input(char), // 输入字符
    Paste(String),
    DeleteChar,  // Backspace
    Dismiss,     // 关闭提示
}
