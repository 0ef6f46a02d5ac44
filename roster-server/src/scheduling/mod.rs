//! 排班核心
//!
//! - [`rules`] - 分配规则校验（纯函数）
//! - [`calendar`] - 月/周日历投影（纯函数）
//! - [`cache`] - 按窗口缓存的班次列表
//! - [`service`] - 校验 → 确认 → 持久化

pub mod cache;
pub mod calendar;
pub mod rules;
pub mod service;

pub use cache::ShiftWindowCache;
pub use calendar::{CalendarCell, CalendarGrid, CalendarMode, CalendarView, Scheduled};
pub use rules::{
    AssignmentChecker, AssignmentDecision, CrossLocationConflict, RejectReason, RoleRestrictions,
};
pub use service::{ScheduleService, ShiftProposal};
