//! Instructions sent to the draft generator.

use crate::models::OfficerIdentity;

/// Sections every generated report must contain, in order.
pub const REPORT_SECTIONS: [&str; 5] = [
    "Officer's Name and Badge Number",
    "Incident Summary",
    "Timeline of Events",
    "Key Evidence Description (from photos/video)",
    "Actions Taken",
];

/// Instruction for synthesizing the first draft from all uploaded evidence.
pub fn initial_draft_instructions(officer: &OfficerIdentity) -> String {
    let sections = REPORT_SECTIONS
        .iter()
        .enumerate()
        .map(|(i, section)| format!("{}. {}", i + 1, section))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are an AI assistant for a Police Officer. The reporting officer is {name} \
with Badge Number {badge}. Your task is to listen to the audio, transcribe the spoken words, \
analyze the images/video, and synthesize ALL attached evidence into a formal Police Incident Report.

The report MUST contain these sections:
{sections}

Maintain a professional, objective, and factual tone.",
        name = officer.full_name,
        badge = officer.badge_number,
        sections = sections,
    )
}

/// Instruction for merging a spoken correction into the current draft.
pub fn audio_correction_instructions(current_draft: &str) -> String {
    format!(
        "Here is the current report draft: {current_draft}.
Listen to the attached audio file. This audio contains instructions for corrections or additions.
Please integrate the new information into the appropriate sections of the report.
Return ONLY the revised, complete report text."
    )
}
