//! Long help text for the subcommands, kept out of `cli.rs` so the argument
//! definitions stay readable.

pub const SZZ: &str = "\
Find bug-introducing commits with the SZZ algorithm.

A commit is a bug fix when its subject contains one of the configured
keywords (case-sensitive substring match). For each fix, the lines it
removes are traced with blame on the parent revision back to the commit
that last touched them. That commit is reported as bug-introducing.

Root commits have no parent and are never attributed. Merge commits are
diffed against their first parent unless `merge_policy = \"skip\"`.
Attributions are deduplicated on (introducing commit, file, line).

Examples:
  ctrail szz ./repo                     # table of attributions
  ctrail szz ./repo --json              # machine-readable output
  ctrail szz ./repo --keywords fix,bug  # custom vocabulary";

pub const ANCESTORS: &str = "\
Print the ancestor and descendant counts of commits.

Ancestors are every commit reachable through parent links, excluding the
commit itself. Hashes not found in the history are reported and skipped.

Examples:
  ctrail ancestors ./repo 3f2a9c1e...          # one commit
  ctrail ancestors ./repo HASH1 HASH2 --json   # several, as JSON";

pub const FAULTS: &str = "\
Annotate data-clump reports with the faults introduced before their commit.

Reports are grouped by `project_info.project_name`. For every project SZZ
runs once over its repository, and each report gets

  report_summary.number_of_bug_introducing_commits

set to the number of attributions whose introducing commit is a proper
ancestor of the report's commit. Reports are rewritten in place, atomically.
Already annotated reports are skipped unless --force is given.

One project failing never stops the others.

Examples:
  ctrail faults reports/ --repo ./repo           # every report, one repository
  ctrail faults reports/ --repos-root ./repos    # ./repos/<project_name>
  ctrail faults reports/ --repo ./repo --force   # recompute existing values";

pub const EVOLUTION: &str = "\
Classify how data clumps evolve over a project's snapshot history.

Each sub-folder of FOLDER holds the reports of one project. Snapshots are
ordered by commit date and every smell key falls into one category:

  A  present from start till end
  B  appears after the start, survives to the end
  C  present at the start, gone by the end
  D  appears and disappears between start and end
  E  present at both ends, missing somewhere in between

Examples:
  ctrail evolution reports/                              # per-project table
  ctrail evolution reports/ --smell-key sorted-variables # key by variables
  ctrail evolution reports/ --json";

pub const CORRELATE: &str = "\
Spearman rank correlation between fault annotations and data clump counts.

Only reports carrying number_of_bug_introducing_commits are used (run
`ctrail faults` first). Per project, the annotation is correlated with the
total clump count and each clump kind. Ties get averaged ranks.

Strength by |rho|: > 0.7 very strong, > 0.5 strong, > 0.3 moderate,
> 0.1 weak, otherwise none. Fewer than two reports or a constant series
leave the value undefined.

Examples:
  ctrail correlate reports/
  ctrail correlate reports/ --json";
