//! UI 模块
//!
//! 采用 MVI (Model-View-Intent) 架构：
//! - Model (state.rs): App 结构体及其状态数据
//! - View (view/): 纯函数，将 State 映射为 UI
//! - Intent (actions.rs): 用户交互转化为明确的语义化 Action
//!
//! 区块表单 (section_editor.rs) 与设置表单 (settings_form.rs) 只读取快照并产出 Command。

pub mod actions;
pub mod input;
pub mod logic;
pub mod section_editor;
pub mod settings_form;
pub mod state;
pub mod view;

// Re-export for convenience
pub use input::handle_key_event;
pub use state::App;
pub use view::render;
