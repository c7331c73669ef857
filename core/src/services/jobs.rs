use crate::models::Job;

/// Jobs offered in the activity form: active ones only, and no special
/// jobs when the entry is extra hours.
pub fn filter_jobs(jobs: Vec<Job>, is_extra: bool) -> Vec<Job> {
    let mut jobs: Vec<Job> = jobs
        .into_iter()
        .filter(|job| job.active && !(is_extra && job.special))
        .collect();
    jobs.sort_by(|a, b| a.code.cmp(&b.code));
    jobs
}
