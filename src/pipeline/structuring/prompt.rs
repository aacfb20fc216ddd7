use super::sanitize::sanitize_for_llm_with_audit;
use crate::models::{MedicalRecord, MedicationStatus, RecordCategory};

pub const ASSISTANT_SYSTEM_PROMPT: &str = "你是一个专业的医疗健康助手。只根据提供的资料回答，不要编造信息。";

/// Instruction asking for the `# section` / `### card` / `- **label**: value` layout
/// that `parse_summary` understands.
const SUMMARY_INSTRUCTIONS: &str = r####"请根据以下患者的医疗记录数据，整理生成一份清晰的健康档案。

用户要求：**不要使用复杂的表格形式**。请以简单明了的列表或卡片形式展示关键信息。

请按照以下结构输出（Markdown格式）：

# 总体健康概况
（在此处用一段简练的语言总结患者的病情、主要治疗经过和当前状态。）

# 详细诊疗时间轴
请将相关的记录整合为一个个具体的诊疗事件，对于每个事件，请使用 "### YYYY-MM-DD 标题" 作为开头，并严格包含以下字段（若原文未提及，请填“未记录”或“无”）：

### [日期] [事件标题]
- **医院**: [医院名称]
- **重要检查检验结果**: [提取关键指标或诊断结论]
- **用药方案**: [主要药物及用法]
- **治疗效果**: [好转/稳定/恶化等]
- **下次治疗时间**: [如有提及请列出]"####;

pub const IDENTIFY_MEDICATION_PROMPT: &str = "请识别这张图片中的药物。\
1. 请仔细阅读**药盒上的所有文字**（OCR），准确提取通用名（如“阿莫西林胶囊”）和商品名。\
2. 提取其功能主治和用法用量。\
请返回 JSON 格式，包含两个字段：'name' (药物名称) 和 'description' \
(根据包装文字总结的说明书内容，使用清晰的中文，包含【适应症】【用法用量】【注意事项】等部分)。\
如果无法识别，name 返回 '未知药物'。只输出 JSON。";

/// Build the summary prompt listing every record.
pub fn build_summary_prompt(records: &[MedicalRecord]) -> String {
    format!(
        "{SUMMARY_INSTRUCTIONS}\n\n原始数据：\n{}\n\n请确保排版整洁，简洁易读。",
        format_records(records)
    )
}

/// Plain-text listing of records, one block per record.
pub fn format_records(records: &[MedicalRecord]) -> String {
    records
        .iter()
        .map(format_record)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn format_record(record: &MedicalRecord) -> String {
    let id = record.id.to_string();
    format!(
        "- 日期: {}\n- 类型: {}\n- 标题: {}\n- 详情: {}\n- 状态: {}",
        record.date.format("%Y-%m-%d"),
        record.category.label(),
        sanitize_for_llm_with_audit(&record.title, Some(&id)),
        sanitize_for_llm_with_audit(&record.description, Some(&id)),
        MedicationStatus::prompt_label(record.status),
    )
}

/// Category-specific instruction for refining a record from its photo.
pub fn analysis_prompt(category: RecordCategory) -> &'static str {
    match category {
        RecordCategory::Medication => {
            "请分析这张药物图片。请提取以下信息并整理成精炼的文本：\
             1. 药物名称。 2. 主要功效/适应症。 3. 用法用量。 4. 关键注意事项。\
             请直接输出整理好的文本内容，不要输出 JSON。"
        }
        RecordCategory::LabResult => {
            "请分析这张化验单/检查报告图片。1. 识别报告名称和日期。 \
             2. **重点提取异常指标**（有箭头或标红的项），列出项目名、数值及参考范围。 \
             3. 提取诊断意见或结论。请以“【检查结果分析】”开头，整理成易读的文本。"
        }
        RecordCategory::Billing => {
            "请分析这张医疗费用清单/发票。请提取：1. 总金额。 2. 医保支付金额（如有）。 \
             3. 主要的费用大类（如药费、检查费等）。请简明扼要地总结费用情况。"
        }
        RecordCategory::Admission => {
            "请分析这张出入院记录/病历图片。请提取：1. 入院/就诊诊断。 2. 主要治疗经过。 \
             3. 出院医嘱或建议。请整理成结构清晰的病历摘要。"
        }
    }
}
