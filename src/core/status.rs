use crate::models::record::AttendanceRecord;
use crate::models::status::DayStatus;
use crate::utils::colors::{colorize_in_out, colorize_optional};
use crate::utils::time::format_minutes;

pub struct StatusLogic;

impl StatusLogic {
    /// Render one day record for the `status` command.
    pub fn print_record(rec: &AttendanceRecord) {
        let state_icon = match rec.status {
            DayStatus::NotCheckedIn => "💤",
            DayStatus::CheckedIn => "🟢",
            DayStatus::OnBreak => "☕",
            DayStatus::CheckedOut => "🔴",
        };

        println!(
            "{} {} | {} is {}{}",
            state_icon,
            rec.date_str(),
            rec.worker_id,
            rec.status.label(),
            if rec.pending_sync {
                " (pending sync)"
            } else {
                ""
            }
        );

        println!(
            "   in:  {}   out: {}",
            colorize_in_out(&AttendanceRecord::time_str(rec.check_in), true),
            colorize_in_out(&AttendanceRecord::time_str(rec.check_out), false),
        );

        let break_line = match (rec.break_start, rec.break_end) {
            (Some(s), None) => format!(
                "on break since {}",
                AttendanceRecord::time_str(Some(s))
            ),
            (Some(s), Some(e)) => format!(
                "last break {} → {}",
                AttendanceRecord::time_str(Some(s)),
                AttendanceRecord::time_str(Some(e))
            ),
            _ => "no breaks".to_string(),
        };

        println!(
            "   breaks: {} ({})   worked: {}",
            colorize_optional(&format_minutes(rec.break_minutes)),
            break_line,
            colorize_optional(&format_minutes(rec.work_minutes)),
        );
    }
}
