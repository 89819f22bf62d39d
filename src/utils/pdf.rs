//! 发票 PDF 渲染。
//!
//! 布局是纯函数：上层先把记录聚合成 [`InvoiceDoc`]，这里只负责排版。
//! 表格列用 Courier 等宽字体加空格对齐，内置字体无法测量文本宽度，
//! 固定列宽即可满足票据的版式要求。

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

use crate::error::{AppError, AppResult};

#[derive(Debug)]
pub struct InvoiceDoc {
    pub title: String,
    /// 标题下方的说明行（生成时间、日期等）
    pub meta: Vec<String>,
    pub sections: Vec<InvoiceSection>,
}

#[derive(Debug)]
pub struct InvoiceSection {
    pub heading: Option<String>,
    /// 列名，与 `widths` 一一对应
    pub header: Vec<String>,
    /// 每列字符宽度
    pub widths: Vec<usize>,
    pub rows: Vec<Vec<String>>,
    /// 表格下方的 "标签: 金额" 合计行
    pub totals: Vec<(String, String)>,
}

/// 单元格按列宽截断并补齐，行内以空格分列
fn pad_row(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate() {
        let width = widths.get(i).copied().unwrap_or(12);
        let mut text: String = cell.chars().take(width.saturating_sub(1)).collect();
        while text.chars().count() < width {
            text.push(' ');
        }
        line.push_str(&text);
    }
    line
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    mono: IndirectFontRef,
    mono_bold: IndirectFontRef,
}

pub fn render(invoice: &InvoiceDoc) -> AppResult<Vec<u8>> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(&invoice.title, Mm(210.0), Mm(297.0), "Layer 1");

    let pdf_err = |e| AppError::Internal(format!("PDF 渲染失败: {e}"));
    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_err)?,
        mono: doc.add_builtin_font(BuiltinFont::Courier).map_err(pdf_err)?,
        mono_bold: doc.add_builtin_font(BuiltinFont::CourierBold).map_err(pdf_err)?,
    };

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut y = 280.0;

    // 翻页后从页首继续
    let mut next_line = |layer: &mut PdfLayerReference, y: &mut _, advance| {
        *y -= advance;
        if *y < 20.0 {
            let (page, layer_index) = doc.add_page(Mm(210.0), Mm(297.0), "Layer 1");
            *layer = doc.get_page(page).get_layer(layer_index);
            *y = 280.0;
        }
    };

    layer.use_text(&invoice.title, 16.0, Mm(20.0), Mm(y), &fonts.bold);
    for meta in &invoice.meta {
        next_line(&mut layer, &mut y, 7.0);
        layer.use_text(meta, 10.0, Mm(20.0), Mm(y), &fonts.regular);
    }

    for section in &invoice.sections {
        next_line(&mut layer, &mut y, 12.0);
        if let Some(heading) = &section.heading {
            layer.use_text(heading, 12.0, Mm(20.0), Mm(y), &fonts.bold);
            next_line(&mut layer, &mut y, 8.0);
        }

        layer.use_text(
            pad_row(&section.header, &section.widths),
            9.0,
            Mm(20.0),
            Mm(y),
            &fonts.mono_bold,
        );
        for row in &section.rows {
            next_line(&mut layer, &mut y, 5.5);
            layer.use_text(
                pad_row(row, &section.widths),
                9.0,
                Mm(20.0),
                Mm(y),
                &fonts.mono,
            );
        }

        for (label, value) in &section.totals {
            next_line(&mut layer, &mut y, 6.5);
            layer.use_text(
                format!("{label} {value}"),
                10.0,
                Mm(20.0),
                Mm(y),
                &fonts.mono_bold,
            );
        }
    }

    doc.save_to_bytes()
        .map_err(|e| AppError::Internal(format!("PDF 保存失败: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_and_truncates_cells() {
        let widths = vec![6, 4];
        let row = vec!["abcdefghij".to_string(), "xy".to_string()];
        assert_eq!(pad_row(&row, &widths), "abcde xy  ");
    }

    #[test]
    fn renders_empty_invoice() {
        let doc = InvoiceDoc {
            title: "Invoice for nobody".to_string(),
            meta: vec!["Generated on 2025-06-01".to_string()],
            sections: vec![InvoiceSection {
                heading: None,
                header: vec!["Date".to_string(), "Price".to_string()],
                widths: vec![12, 12],
                rows: vec![],
                totals: vec![
                    ("Total Paid:".to_string(), "0.00 MAD".to_string()),
                    ("Total Loan:".to_string(), "0.00 MAD".to_string()),
                ],
            }],
        };
        let bytes = render(&doc).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
