//! Recommendations grouped by priority.

use super::blocks::{bullet, heading, paragraph, subheading_colored};
use super::{SectionInput, SectionKind};
use crate::error::{LayoutError, ReportWarning};
use crate::layout::PageCursor;
use crate::recommend::Priority;
use crate::risk::RiskLevel;

pub fn write(
    input: &SectionInput<'_>,
    cursor: &mut PageCursor,
    _warnings: &mut Vec<ReportWarning>,
) -> Result<(), LayoutError> {
    heading(input, cursor, SectionKind::Recommendations.title())?;
    paragraph(
        input,
        cursor,
        &format!(
            "{} action items for this period, most urgent first.",
            input.recommendations.len()
        ),
    )?;

    let palette = &input.config.palette;
    let mut number = 0;
    for priority in Priority::DESCENDING {
        let group: Vec<_> = input
            .recommendations
            .iter()
            .filter(|r| r.priority == priority)
            .collect();
        if group.is_empty() {
            continue;
        }
        let color = match priority {
            Priority::Urgent | Priority::High => palette.risk_color(RiskLevel::High),
            Priority::Medium => palette.risk_color(RiskLevel::Medium),
            Priority::Low => palette.risk_color(RiskLevel::Low),
        };
        subheading_colored(input, cursor, &format!("{} priority", priority), color)?;
        for rec in group {
            number += 1;
            bullet(input, cursor, &format!("{}.", number), &rec.text)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::Fixture;
    use super::super::SectionKind;
    use sr_common::{DeviceInput, EndpointInput, ReportRequest};

    #[test]
    fn test_groups_in_priority_order() {
        let period = Fixture::empty().metrics.period;
        let request = ReportRequest::new(period)
            .with_endpoints(EndpointInput {
                total: Some(10),
                active: Some(10),
                ..Default::default()
            })
            .with_devices(DeviceInput {
                total: Some(4),
                online: Some(2),
                offline: Some(2),
                ..Default::default()
            });
        let (text, _, _) = Fixture::from_request(request).run(SectionKind::Recommendations);
        let medium = text.iter().position(|t| t == "Medium priority").unwrap();
        let low = text.iter().position(|t| t == "Low priority").unwrap();
        assert!(medium < low);
        assert!(!text.iter().any(|t| t == "Urgent priority"));
        assert!(text.iter().any(|t| t == "3 action items for this period, most urgent first."));
        assert!(text
            .iter()
            .any(|t| t == "Restore connectivity for 2 offline devices"));
    }
}
