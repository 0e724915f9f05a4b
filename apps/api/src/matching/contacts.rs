use crate::models::job_match::Contact;

const COMPANY: &str = "TechCorp";

/// Fixed outreach suggestions attached to every match.
pub fn suggested_contacts() -> Vec<Contact> {
    [
        ("Sarah Johnson", "Senior Software Engineer", "sarah-johnson", 0.8),
        ("Mike Chen", "Engineering Manager", "mike-chen", 0.7),
        ("Emily Rodriguez", "Technical Recruiter", "emily-rodriguez", 0.9),
    ]
    .into_iter()
    .map(|(name, role, handle, mutual_score)| Contact {
        name: name.to_string(),
        role: role.to_string(),
        company: COMPANY.to_string(),
        linkedin_url: Some(format!("https://linkedin.com/in/{handle}")),
        email: None,
        mutual_score,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_contacts_at_techcorp() {
        let contacts = suggested_contacts();
        assert_eq!(contacts.len(), 3);
        assert!(contacts.iter().all(|c| c.company == "TechCorp"));
        assert_eq!(contacts[0].name, "Sarah Johnson");
        assert_eq!(
            contacts[2].linkedin_url.as_deref(),
            Some("https://linkedin.com/in/emily-rodriguez")
        );
        assert!(contacts.iter().all(|c| (0.0..=1.0).contains(&c.mutual_score)));
    }
}
