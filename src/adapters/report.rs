use crate::domain::model::{DomainReport, ReportCell, ReportFormat, REPORT_COLUMNS};
use crate::utils::error::{ReportError, Result};
use rust_xlsxwriter::{Format, Workbook};

pub const SHEET_NAME: &str = "WHOIS";

const COLUMN_WIDTHS: [f64; 7] = [32.0, 18.0, 18.0, 16.0, 18.0, 22.0, 12.0];

/// Renders the reports to an in-memory file of the given format.
pub fn render(format: ReportFormat, reports: &[DomainReport]) -> Result<Vec<u8>> {
    match format {
        ReportFormat::Xlsx => render_xlsx(reports),
        ReportFormat::Csv => render_csv(reports),
    }
}

pub fn render_csv(reports: &[DomainReport]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(REPORT_COLUMNS)?;
    for report in reports {
        writer.write_record(report.text_row())?;
    }
    writer
        .into_inner()
        .map_err(|e| ReportError::IoError(e.into_error()))
}

pub fn render_xlsx(reports: &[DomainReport]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, title) in REPORT_COLUMNS.iter().enumerate() {
        let col = col as u16;
        worksheet.write_string_with_format(0, col, *title, &header)?;
        worksheet.set_column_width(col, COLUMN_WIDTHS[col as usize])?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    for (index, report) in reports.iter().enumerate() {
        let row = (index + 1) as u32;
        for (col, cell) in report.cells().iter().enumerate() {
            let col = col as u16;
            match cell {
                ReportCell::Text(text) => worksheet.write_string(row, col, text)?,
                ReportCell::Integer(value) => worksheet.write_number(row, col, *value as f64)?,
            };
        }
    }

    Ok(workbook.save_to_buffer()?)
}
