use chrono::{DateTime, FixedOffset, Utc};
use rust_xlsxwriter::*;

use crate::error::Result;
use crate::models::shift::ShiftWithWorker;
use crate::utils::time::{format_duration, hours};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub struct ExportService;

impl ExportService {
    fn local(ts: DateTime<Utc>, offset: FixedOffset) -> String {
        ts.with_timezone(&offset).format("%Y-%m-%d %H:%M").to_string()
    }

    fn position(lat: Option<f64>, lng: Option<f64>) -> String {
        match (lat, lng) {
            (Some(lat), Some(lng)) => format!("{:.5}, {:.5}", lat, lng),
            _ => "—".to_string(),
        }
    }
}

impl ExportService {
    /// Styled timesheet workbook, one row per shift. Open shifts are timed
    /// up to `now`; timestamps are rendered in `offset`.
    pub fn generate_timesheet_xlsx(
        records: &[ShiftWithWorker],
        now: DateTime<Utc>,
        offset: FixedOffset,
    ) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Timesheet")?;

        // ── Color palette ──
        let primary_color = Color::RGB(0x1E293B);
        let header_bg = Color::RGB(0x0F172A);
        let header_text = Color::White;
        let alt_row_1 = Color::RGB(0xF8FAFC);
        let alt_row_2 = Color::White;
        let border_color = Color::RGB(0xE2E8F0);
        let active_color = Color::RGB(0x10B981);
        let closed_color = Color::RGB(0x64748B);

        let columns = [
            ("#", 6.0),
            ("Worker", 28.0),
            ("Role", 16.0),
            ("Clock in", 18.0),
            ("Clock out", 18.0),
            ("Duration", 12.0),
            ("Hours", 10.0),
            ("Clock-in location", 24.0),
            ("Clock-out location", 24.0),
            ("Clock-in note", 36.0),
            ("Clock-out note", 36.0),
            ("Status", 12.0),
        ];
        let last_col = (columns.len() - 1) as u16;

        for (i, (_, width)) in columns.iter().enumerate() {
            worksheet.set_column_width(i as u16, *width)?;
        }

        // ── Title rows ──
        let title_format = Format::new()
            .set_font_size(16)
            .set_bold()
            .set_font_color(header_text)
            .set_background_color(primary_color)
            .set_align(FormatAlign::CenterAcross)
            .set_align(FormatAlign::VerticalCenter);
        worksheet.set_row_height(0, 40)?;
        worksheet.merge_range(0, 0, 0, last_col, "Shift timesheet", &title_format)?;

        let subtitle_format = Format::new()
            .set_font_size(10)
            .set_italic()
            .set_font_color(Color::RGB(0x94A3B8))
            .set_background_color(primary_color)
            .set_align(FormatAlign::CenterAcross)
            .set_align(FormatAlign::VerticalCenter);
        worksheet.set_row_height(1, 22)?;
        let subtitle = format!(
            "Exported {} (UTC{})  •  {} shifts",
            Self::local(now, offset),
            offset,
            records.len()
        );
        worksheet.merge_range(1, 0, 1, last_col, &subtitle, &subtitle_format)?;

        // ── Header row ──
        let header_format = Format::new()
            .set_bold()
            .set_font_size(10)
            .set_font_color(header_text)
            .set_background_color(header_bg)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap()
            .set_border(FormatBorder::Thin)
            .set_border_color(border_color);
        let header_row = 2;
        worksheet.set_row_height(header_row, 30)?;
        for (i, (name, _)) in columns.iter().enumerate() {
            worksheet.write_string_with_format(header_row, i as u16, *name, &header_format)?;
        }

        // ── Data rows ──
        let data_start_row = 3;
        let mut total_hours = 0.0;
        for (idx, record) in records.iter().enumerate() {
            let row = data_start_row + idx as u32;
            let shift = &record.shift;
            let span = shift.duration(now);
            total_hours += hours(span);

            let bg = if idx % 2 == 0 { alt_row_1 } else { alt_row_2 };
            let base_fmt = Format::new()
                .set_font_size(10)
                .set_background_color(bg)
                .set_align(FormatAlign::VerticalCenter)
                .set_border(FormatBorder::Thin)
                .set_border_color(border_color);
            let center_fmt = base_fmt.clone().set_align(FormatAlign::Center);
            let wrap_fmt = base_fmt.clone().set_text_wrap();
            let hours_fmt = center_fmt.clone().set_num_format("0.00");

            worksheet.set_row_height(row, 22)?;
            worksheet.write_number_with_format(row, 0, (idx + 1) as f64, &center_fmt)?;
            worksheet.write_string_with_format(row, 1, &record.worker_name, &base_fmt.clone().set_bold())?;
            worksheet.write_string_with_format(row, 2, record.worker_role.as_str(), &center_fmt)?;
            worksheet.write_string_with_format(row, 3, Self::local(shift.clock_in, offset), &center_fmt)?;
            let clock_out = shift
                .clock_out
                .map(|ts| Self::local(ts, offset))
                .unwrap_or_else(|| "—".to_string());
            worksheet.write_string_with_format(row, 4, &clock_out, &center_fmt)?;
            worksheet.write_string_with_format(row, 5, format_duration(span), &center_fmt)?;
            worksheet.write_number_with_format(row, 6, hours(span), &hours_fmt)?;
            worksheet.write_string_with_format(
                row,
                7,
                Self::position(Some(shift.clock_in_lat), Some(shift.clock_in_lng)),
                &base_fmt,
            )?;
            worksheet.write_string_with_format(
                row,
                8,
                Self::position(shift.clock_out_lat, shift.clock_out_lng),
                &base_fmt,
            )?;
            worksheet.write_string_with_format(row, 9, shift.clock_in_note.as_deref().unwrap_or("—"), &wrap_fmt)?;
            worksheet.write_string_with_format(row, 10, shift.clock_out_note.as_deref().unwrap_or("—"), &wrap_fmt)?;

            let (status, status_color) = if shift.is_open() {
                ("Active", active_color)
            } else {
                ("Closed", closed_color)
            };
            let status_fmt = Format::new()
                .set_font_size(10)
                .set_bold()
                .set_font_color(Color::White)
                .set_background_color(status_color)
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
                .set_border(FormatBorder::Thin)
                .set_border_color(border_color);
            worksheet.write_string_with_format(row, 11, status, &status_fmt)?;
        }

        // ── Summary row ──
        let total_row = data_start_row + records.len() as u32 + 1;
        let summary_fmt = Format::new()
            .set_bold()
            .set_font_size(10)
            .set_font_color(primary_color)
            .set_background_color(Color::RGB(0xE0E7FF))
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_border(FormatBorder::Thin)
            .set_border_color(border_color);
        worksheet.set_row_height(total_row, 26)?;

        let active = records.iter().filter(|r| r.shift.is_open()).count();
        worksheet.merge_range(
            total_row,
            0,
            total_row,
            5,
            &format!("Total: {} shifts, {} active", records.len(), active),
            &summary_fmt,
        )?;
        worksheet.write_number_with_format(total_row, 6, total_hours, &summary_fmt.clone().set_num_format("0.00"))?;
        for col in 7..=last_col {
            worksheet.write_string_with_format(total_row, col, "", &summary_fmt)?;
        }

        worksheet.set_freeze_panes(3, 0)?;
        worksheet.autofilter(
            header_row,
            0,
            (data_start_row + records.len() as u32).saturating_sub(1).max(header_row),
            last_col,
        )?;

        let buffer = workbook.save_to_buffer()?;
        Ok(buffer)
    }
}
