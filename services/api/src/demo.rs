use clap::Args;
use std::sync::Arc;

use jobconnect::error::AppError;
use jobconnect::workflows::marketplace::profiles::{
    CompanySubmission, JobSeekerSubmission, RecruiterSubmission,
};
use jobconnect::workflows::marketplace::{
    Actor, CandidateSearch, InvitationDraft, InvitationReply, InvitationService, InvitationView,
    JobType, MatchPolicy, NotificationHub, NotificationService, Notifier, ProfileService,
    SearchCriteria, SeekerStatus,
};

use crate::infra::{
    InMemoryCompanies, InMemoryInvitations, InMemoryJobSeekers, InMemoryNotifications,
    InMemoryRecruiters,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Minimum match percentage a candidate must reach (defaults to 60)
    #[arg(long)]
    pub(crate) threshold: Option<u8>,
    /// Have the candidate decline instead of accepting
    #[arg(long)]
    pub(crate) decline: bool,
    /// Stop after the search and invitation, before the candidate replies
    #[arg(long)]
    pub(crate) skip_response: bool,
}

/// Walk both sides of the marketplace end to end: onboarding, search,
/// invitation, response, and the notification trail.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let seekers = Arc::new(InMemoryJobSeekers::default());
    let companies = Arc::new(InMemoryCompanies::default());
    let recruiters = Arc::new(InMemoryRecruiters::default());
    let invitations = Arc::new(InMemoryInvitations::default());
    let notifications = Arc::new(InMemoryNotifications::default());
    let hub = Arc::new(NotificationHub::new());

    let notifier = Arc::new(Notifier::new(notifications.clone(), hub.clone()));
    let profiles = ProfileService::new(
        seekers.clone(),
        companies.clone(),
        recruiters.clone(),
        notifier.clone(),
    );
    let policy = MatchPolicy {
        threshold: args.threshold.unwrap_or_else(|| MatchPolicy::default().threshold),
    };
    let search = CandidateSearch::new(seekers.clone(), policy);
    let invitation_service = InvitationService::new(
        invitations,
        seekers,
        recruiters,
        companies,
        notifier,
    );
    let notification_service = NotificationService::new(notifications);

    println!("JobConnect marketplace demo");

    // Recruiter side: onboard and watch the live channel.
    let recruiter = Actor::recruiter("demo-recruiter");
    let mut recruiter_inbox = hub.subscribe(&recruiter.user_id);
    let (recruiter_profile, company) = match profiles.create_recruiter(
        &recruiter,
        RecruiterSubmission {
            company: CompanySubmission {
                name: "Initech".to_string(),
                description: "Workflow software for mid-market teams".to_string(),
                website: "https://initech.example".to_string(),
            },
            name: "Dana".to_string(),
            description: "Technical recruiter".to_string(),
            experience_years: 4,
        },
    ) {
        Ok(onboarded) => onboarded,
        Err(err) => {
            println!("  Recruiter onboarding failed: {err}");
            return Ok(());
        }
    };
    println!(
        "- Onboarded recruiter {} at {} ({})",
        recruiter_profile.name, company.name, recruiter_profile.id.0
    );
    if let Ok(pushed) = recruiter_inbox.try_recv() {
        println!("  Live push: {}", pushed.message);
    }

    // Candidate side: a few profiles with different skill overlaps.
    let candidates: [(&str, &[&str], SeekerStatus); 3] = [
        ("Rishi", &["React", "Node", "SQL"], SeekerStatus::Seeking),
        ("Asha", &["React", "Vue"], SeekerStatus::Seeking),
        ("Marco", &["React", "Node", "Go"], SeekerStatus::Working),
    ];
    let mut top_candidate = None;
    for (index, (name, candidate_skills, status)) in candidates.into_iter().enumerate() {
        let actor = Actor::job_seeker(format!("demo-seeker-{index}"));
        let submission = JobSeekerSubmission {
            name: name.to_string(),
            education: Default::default(),
            skills: candidate_skills.iter().map(|skill| skill.to_string()).collect(),
            projects: Vec::new(),
            languages: ["English".to_string()].into(),
            field_of_interest: "Backend".to_string(),
            work_experience: 3,
            min_salary: 95_000,
            job_type: JobType::FullTime,
            current_status: status,
        };
        match profiles.create_job_seeker(&actor, submission) {
            Ok(profile) => {
                println!(
                    "- Registered candidate {} ({}, {})",
                    profile.name,
                    profile.id.0,
                    profile.current_status.label()
                );
                if top_candidate.is_none() && status == SeekerStatus::Seeking {
                    top_candidate = Some((actor, profile));
                }
            }
            Err(err) => println!("  Candidate registration failed: {err}"),
        }
    }

    // Search: two of three required skills clears the default threshold.
    let criteria = SearchCriteria {
        required_skills: ["React", "Node", "Go"]
            .iter()
            .map(|skill| skill.to_string())
            .collect(),
        min_experience: 0,
        salary_min: 50_000,
        salary_max: 120_000,
        project_required: false,
        language: None,
        job_type: None,
    };
    println!("\nSearching for React / Node / Go (threshold {}%)", policy.threshold);
    let matches = match search.search(&criteria) {
        Ok(matches) => matches,
        Err(err) => {
            println!("  Search failed: {err}");
            return Ok(());
        }
    };
    if matches.is_empty() {
        println!("  No candidates cleared the threshold");
        return Ok(());
    }
    for candidate in &matches {
        println!(
            "  {:>3}% {} ({} skills, expects ${})",
            candidate.match_percentage,
            candidate.profile.name,
            candidate.profile.skills.len(),
            candidate.profile.min_salary
        );
    }

    // Invite the strongest match.
    let Some((seeker_actor, seeker_profile)) = top_candidate else {
        return Ok(());
    };
    let invitation = match invitation_service.create(
        &recruiter,
        InvitationDraft {
            job_seeker_id: matches[0].profile.id.clone(),
            role_title: "Backend Engineer".to_string(),
            required_skills: criteria.required_skills.clone(),
            salary_range: "$95,000 - $120,000".to_string(),
            message: "Your profile stood out for our platform team.".to_string(),
        },
    ) {
        Ok(invitation) => invitation,
        Err(err) => {
            println!("  Invitation failed: {err}");
            return Ok(());
        }
    };
    println!(
        "\nInvited {} for {} ({})",
        seeker_profile.name, invitation.role_title, invitation.id.0
    );

    if args.skip_response {
        println!("Stopping before the candidate replies (--skip-response)");
        return Ok(());
    }

    // Candidate replies; the recruiter sees both the push and the stored row.
    let reply = if args.decline {
        InvitationReply::Declined
    } else {
        InvitationReply::Accepted
    };
    match invitation_service.respond(&seeker_actor, &invitation.id, reply) {
        Ok(resolved) => println!("Candidate replied: {}", resolved.status.label()),
        Err(err) => {
            println!("  Reply failed: {err}");
            return Ok(());
        }
    }
    if let Ok(pushed) = recruiter_inbox.try_recv() {
        println!("Live push to recruiter: {}", pushed.message);
    }

    for actor in [&recruiter, &seeker_actor] {
        match invitation_service.dashboard(actor) {
            Ok(dashboard) => {
                println!(
                    "\n{} dashboard: {} total / {} pending / {} accepted / {} declined",
                    actor.role.label(),
                    dashboard.stats.total,
                    dashboard.stats.pending,
                    dashboard.stats.accepted,
                    dashboard.stats.declined
                );
                for InvitationView {
                    invitation,
                    counterpart,
                } in &dashboard.invitations
                {
                    match &counterpart.company {
                        Some(company) => println!(
                            "  {} <- {} at {} [{}]",
                            invitation.role_title,
                            counterpart.name,
                            company,
                            invitation.status.label()
                        ),
                        None => println!(
                            "  {} -> {} [{}]",
                            invitation.role_title,
                            counterpart.name,
                            invitation.status.label()
                        ),
                    }
                }
            }
            Err(err) => println!("  Dashboard unavailable: {err}"),
        }
    }

    match notification_service.recent(&recruiter) {
        Ok(feed) => {
            println!("\nRecruiter notification feed:");
            for notification in feed {
                let marker = if notification.read { "read" } else { "unread" };
                println!("  [{marker}] {}", notification.message);
            }
        }
        Err(err) => println!("  Notification feed unavailable: {err}"),
    }

    Ok(())
}
