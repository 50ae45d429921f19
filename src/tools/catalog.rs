//! Built-in tool catalog — the project-management API surface as data.
//!
//! Every tool here is an ordinary [`ToolSpec`]; the engine knows nothing
//! about users, bugs or tasks. Backend endpoints follow the
//! `/index.php?m=<module>&f=<method>&t=json` convention.

use serde_json::json;

use crate::tools::schema::{ParamDef, ToolSpec};

const PRIORITIES: &[&str] = &["1", "2", "3", "4"];
const SEVERITIES: &[&str] = &["1", "2", "3", "4"];
const BUG_RESOLUTIONS: &[&str] = &[
    "bydesign",
    "duplicate",
    "external",
    "fixed",
    "notrepro",
    "postponed",
    "willnotfix",
];
const TASK_TYPES: &[&str] = &[
    "design", "devel", "request", "test", "study", "discuss", "ui", "affair", "misc",
];
const STORY_STATUSES: &[&str] = &["draft", "active", "closed", "changed", "reviewing"];

/// All built-in tools, grouped by backend module.
pub fn builtin_tools() -> Vec<ToolSpec> {
    let mut tools = Vec::new();
    tools.extend(user_tools());
    tools.extend(product_tools());
    tools.extend(project_tools());
    tools.extend(task_tools());
    tools.extend(bug_tools());
    tools.extend(story_tools());
    tools.extend(build_tools());
    tools
}

fn endpoint(module: &str, method: &str) -> String {
    format!("/index.php?m={}&f={}&t=json", module, method)
}

fn paging(spec: ToolSpec) -> ToolSpec {
    spec.param(
        ParamDef::int("recPerPage")
            .describe("Records per page")
            .default_value(json!(20)),
    )
    .param(
        ParamDef::int("pageID")
            .describe("Page number, starting at 1")
            .default_value(json!(1)),
    )
}

fn user_tools() -> Vec<ToolSpec> {
    vec![
        paging(
            ToolSpec::get("list_users", "List users in the organization", endpoint("company", "browse"))
                .param(ParamDef::int("deptID").describe("Restrict to one department")),
        ),
        ToolSpec::get("get_user", "Show one user's profile", endpoint("user", "profile"))
            .param(ParamDef::string("account").required().describe("Login account")),
        ToolSpec::get("delete_user", "Delete a user", endpoint("user", "delete"))
            .param(ParamDef::int("userID").required().describe("User ID")),
    ]
}

fn product_tools() -> Vec<ToolSpec> {
    vec![
        ToolSpec::get("list_products", "List products", endpoint("product", "all"))
            .param(
                ParamDef::one_of("status", &["all", "noclosed", "closed"])
                    .default_value(json!("noclosed")),
            ),
        ToolSpec::get("get_product", "Show one product", endpoint("product", "view"))
            .param(ParamDef::int("productID").required()),
        ToolSpec::post("create_product", "Create a product", endpoint("product", "create"))
            .param(ParamDef::string("name").required().in_body())
            .param(ParamDef::string("code").required().in_body().describe("Short product code"))
            .param(ParamDef::string("PO").in_body().describe("Product owner account"))
            .param(ParamDef::string("desc").in_body())
            .param(ParamDef::one_of("acl", &["open", "private"]).in_body()),
    ]
}

fn project_tools() -> Vec<ToolSpec> {
    vec![
        paging(
            ToolSpec::get("list_projects", "List projects", endpoint("project", "browse"))
                .param(
                    ParamDef::one_of("status", &["all", "wait", "doing", "suspended", "closed"])
                        .default_value(json!("all")),
                ),
        ),
        ToolSpec::get("get_project", "Show one project", endpoint("project", "view"))
            .param(ParamDef::int("projectID").required()),
        ToolSpec::get("list_executions", "List executions (sprints) of a project", endpoint("project", "execution"))
            .param(ParamDef::int("projectID").required())
            .param(ParamDef::one_of("status", &["all", "undone", "wait", "doing", "closed"])),
    ]
}

fn task_tools() -> Vec<ToolSpec> {
    vec![
        paging(
            ToolSpec::get("list_tasks", "List tasks of an execution", endpoint("execution", "task"))
                .param(ParamDef::int("executionID").required())
                .param(
                    ParamDef::one_of("status", &["all", "wait", "doing", "done", "closed", "assignedtome"])
                        .default_value(json!("all")),
                ),
        ),
        ToolSpec::get("get_task", "Show one task", endpoint("task", "view"))
            .param(ParamDef::int("taskID").required()),
        ToolSpec::post(
            "create_task",
            "Create a task in an execution",
            format!("{}&executionID={{executionID}}", endpoint("task", "create")),
        )
        .param(ParamDef::int("executionID").required().in_path())
        .param(ParamDef::string("name").required().in_body())
        .param(ParamDef::one_of("type", TASK_TYPES).required().in_body())
        .param(ParamDef::string_list("assignedTo").in_body().describe("Assignee accounts"))
        .param(ParamDef::one_of("pri", PRIORITIES).in_body().default_value(json!("3")))
        .param(ParamDef::float("estimate").in_body().describe("Estimated hours"))
        .param(ParamDef::string("deadline").in_body().describe("YYYY-MM-DD"))
        .param(ParamDef::string("desc").in_body()),
        ToolSpec::post("finish_task", "Mark a task finished", endpoint("task", "finish"))
            .param(ParamDef::int("taskID").required())
            .param(ParamDef::float("consumed").required().in_body().describe("Hours spent"))
            .param(ParamDef::string("comment").in_body()),
        ToolSpec::post("assign_task", "Reassign a task", endpoint("task", "assignTo"))
            .param(ParamDef::int("taskID").required())
            .param(ParamDef::string("assignedTo").required().in_body())
            .param(ParamDef::string("comment").in_body()),
    ]
}

fn bug_tools() -> Vec<ToolSpec> {
    vec![
        paging(
            ToolSpec::get("list_bugs", "List bugs of a product", endpoint("bug", "browse"))
                .param(ParamDef::int("productID").required())
                .param(
                    ParamDef::one_of(
                        "browseType",
                        &["all", "unclosed", "unresolved", "assigntome", "openedbyme"],
                    )
                    .default_value(json!("unclosed")),
                ),
        ),
        ToolSpec::get("get_bug", "Show one bug", endpoint("bug", "view"))
            .param(ParamDef::int("bugID").required()),
        ToolSpec::post("create_bug", "Report a bug against a product", endpoint("bug", "create"))
            .param(ParamDef::int("productID").required())
            .param(ParamDef::string("title").required().in_body())
            .param(ParamDef::one_of("severity", SEVERITIES).in_body().default_value(json!("3")))
            .param(ParamDef::one_of("pri", PRIORITIES).in_body().default_value(json!("3")))
            .param(ParamDef::string("steps").in_body().describe("Reproduction steps"))
            .param(ParamDef::string_list("openedBuild").in_body().default_value(json!(["trunk"])))
            .param(ParamDef::string("assignedTo").in_body()),
        ToolSpec::post("resolve_bug", "Resolve a bug", endpoint("bug", "resolve"))
            .param(ParamDef::int("bugID").required())
            .param(ParamDef::one_of("resolution", BUG_RESOLUTIONS).required().in_body())
            .param(ParamDef::string("resolvedBuild").in_body())
            .param(ParamDef::int("duplicateBug").in_body())
            .param(ParamDef::string("comment").in_body()),
        ToolSpec::post("close_bug", "Close a resolved bug", endpoint("bug", "close"))
            .param(ParamDef::int("bugID").required())
            .param(ParamDef::string("comment").in_body()),
    ]
}

fn story_tools() -> Vec<ToolSpec> {
    vec![
        paging(
            ToolSpec::get("list_stories", "List stories of a product", endpoint("product", "browse"))
                .param(ParamDef::int("productID").required())
                .param(ParamDef::one_of("status", STORY_STATUSES)),
        ),
        ToolSpec::get("get_story", "Show one story", endpoint("story", "view"))
            .param(ParamDef::int("storyID").required()),
        ToolSpec::post("create_story", "Create a story", endpoint("story", "create"))
            .param(ParamDef::int("productID").required())
            .param(ParamDef::string("title").required().in_body())
            .param(ParamDef::string("spec").in_body())
            .param(ParamDef::string("verify").in_body().describe("Acceptance criteria"))
            .param(ParamDef::one_of("pri", PRIORITIES).in_body().default_value(json!("3")))
            .param(ParamDef::float("estimate").in_body())
            .param(ParamDef::boolean("needNotReview").in_body().default_value(json!(false))),
    ]
}

fn build_tools() -> Vec<ToolSpec> {
    vec![
        ToolSpec::get("list_builds", "List builds of a project", endpoint("project", "build"))
            .param(ParamDef::int("projectID").required()),
        ToolSpec::get("get_build", "Show one build", endpoint("build", "view"))
            .param(ParamDef::int("buildID").required()),
    ]
}
