// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Notification email templates, keyed by inquiry type and locale.

use crate::models::{ContactSubmission, InquiryType, Locale};

/// A rendered notification email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailContent {
    pub subject: String,
    pub text: String,
}

struct Labels {
    subject_prefix: &'static str,
    kind: &'static str,
    name: &'static str,
    email: &'static str,
    company: &'static str,
    message: &'static str,
}

const KO: Labels = Labels {
    subject_prefix: "[웹사이트 문의]",
    kind: "문의 유형",
    name: "이름",
    email: "이메일",
    company: "회사",
    message: "메시지",
};

const EN: Labels = Labels {
    subject_prefix: "[Website Inquiry]",
    kind: "Type",
    name: "Name",
    email: "Email",
    company: "Company",
    message: "Message",
};

fn inquiry_title(locale: Locale, inquiry_type: InquiryType) -> &'static str {
    match (locale, inquiry_type) {
        (Locale::Ko, InquiryType::General) => "일반 문의",
        (Locale::Ko, InquiryType::Service) => "서비스 문의",
        (Locale::Ko, InquiryType::Partnership) => "파트너십 제안",
        (Locale::En, InquiryType::General) => "General inquiry",
        (Locale::En, InquiryType::Service) => "Service inquiry",
        (Locale::En, InquiryType::Partnership) => "Partnership proposal",
    }
}

/// Render the notification email for a submission.
pub fn render(locale: Locale, submission: &ContactSubmission) -> EmailContent {
    let labels = match locale {
        Locale::Ko => &KO,
        Locale::En => &EN,
    };
    let title = inquiry_title(locale, submission.inquiry_type);

    let subject = format!("{} {} - {}", labels.subject_prefix, title, submission.name);
    let text = format!(
        "{}: {} ({})\n{}: {}\n{}: {}\n{}: {}\n\n{}:\n{}\n",
        labels.kind,
        title,
        submission.type_label,
        labels.name,
        submission.name,
        labels.email,
        submission.email,
        labels.company,
        submission.company_or_dash(),
        labels.message,
        submission.message,
    );

    EmailContent { subject, text }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(inquiry_type: InquiryType, company: Option<&str>) -> ContactSubmission {
        ContactSubmission {
            inquiry_type,
            type_label: inquiry_type.as_str().to_string(),
            name: "Kim".to_string(),
            email: "kim@example.com".to_string(),
            company: company.map(str::to_string),
            message: "hello".to_string(),
        }
    }

    #[test]
    fn test_subject_per_type_and_locale() {
        let partnership = submission(InquiryType::Partnership, None);
        assert_eq!(
            render(Locale::En, &partnership).subject,
            "[Website Inquiry] Partnership proposal - Kim"
        );
        assert_eq!(
            render(Locale::Ko, &partnership).subject,
            "[웹사이트 문의] 파트너십 제안 - Kim"
        );

        let service = submission(InquiryType::Service, None);
        assert_ne!(
            render(Locale::En, &service).subject,
            render(Locale::En, &partnership).subject
        );
    }

    #[test]
    fn test_body_fields() {
        let content = render(Locale::En, &submission(InquiryType::General, Some("Wiselake")));
        assert!(content.text.contains("Name: Kim"));
        assert!(content.text.contains("Email: kim@example.com"));
        assert!(content.text.contains("Company: Wiselake"));
        assert!(content.text.ends_with("Message:\nhello\n"));
    }

    #[test]
    fn test_missing_company_rendered_as_dash() {
        let content = render(Locale::Ko, &submission(InquiryType::Service, None));
        assert!(content.text.contains("회사: -"));
    }
}
