use gantt_tool::config;
use gantt_tool::interchange::{self, try_parse_date_ranges};
use gantt_tool::{
    Employee, Project, Task, calendar::parse_iso_date, gantt_dataframe, summary_dataframe,
};
use polars::prelude::{AnyValue, DataFrame, PolarsResult};
use std::io::{self, Write};

fn parse_pattern(s: &str) -> Result<Vec<u8>, String> {
    s.split(',')
        .filter(|p| !p.trim().is_empty())
        .map(|p| {
            p.trim()
                .parse::<u8>()
                .map_err(|_| format!("Invalid weekday index '{}'", p.trim()))
        })
        .collect()
}

fn format_cell(av: &AnyValue) -> String {
    match av {
        AnyValue::Null => String::new(),
        AnyValue::Boolean(true) => "#".to_string(),
        AnyValue::Boolean(false) => ".".to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::String(s) => s.to_string(),
        _ => av.to_string(),
    }
}

fn render_df_as_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let cells: Vec<Vec<String>> = (0..df.height())
        .map(|row_idx| {
            columns
                .iter()
                .map(|col| col.get(row_idx).map(|av| format_cell(&av)).unwrap_or_default())
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.len()).collect();
    for row in &cells {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.len());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |values: &[String]| {
        let mut line = String::from("|");
        for (ci, value) in values.iter().enumerate() {
            line.push(' ');
            line.push_str(value);
            line.push_str(&" ".repeat(widths[ci].saturating_sub(value.len())));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&col_names));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in &cells {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_table(df: PolarsResult<DataFrame>) {
    match df {
        Ok(df) => println!("{}", render_df_as_text_table(&df)),
        Err(e) => println!("Table error: {}", e),
    }
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  project <YYYY-MM-DD> [name...]     Start a new project\n  employee <name> [pattern_csv]      Add or replace an employee (pattern like 0,1,2,3,4; 0 = Monday)\n  pattern <name> <pattern_csv>       Set an employee's working weekdays\n  holiday <name|global> <dates...>   Add holidays (DD/MM/YYYY or YYYY-MM-DD, ranges a-b, comma separated)\n  task <name> <assignee> <days> [dependency|-] [availability] [contingency]\n                                     Add a task\n  compute                            Calculate the schedule\n  show                               Show tasks with their dates\n  gantt                              Show the day-by-day chart\n  range                              Show the project date range\n  save json <path>                   Save the project definition\n  load json <path>                   Load a project definition\n  export csv <path>                  Export the Gantt table\n  import csv <path>                  Add tasks from a Gantt table\n  quit|exit                          Exit"
    );
}

fn require_project(project: &mut Option<Project>) -> Result<&mut Project, String> {
    project
        .as_mut()
        .ok_or_else(|| "No project. Start one with: project <YYYY-MM-DD> [name]".to_string())
}

fn add_task(project: &mut Project, args: &[&str]) -> Result<(), String> {
    let (name, assignee, days) = match args {
        [name, assignee, days, ..] => (*name, *assignee, *days),
        _ => {
            return Err(
                "Usage: task <name> <assignee> <days> [dependency|-] [availability] [contingency]"
                    .to_string(),
            );
        }
    };
    let estimated: u32 = days
        .parse()
        .map_err(|_| format!("Invalid estimated duration '{days}'"))?;
    let mut task = Task::new(name, estimated, assignee);
    if let Some(dependency) = args.get(3).filter(|d| **d != "-") {
        task = task.with_dependency(*dependency);
    }
    if let Some(raw) = args.get(4) {
        let availability = raw
            .parse()
            .map_err(|_| format!("Invalid availability '{raw}'"))?;
        task = task.with_availability(availability);
    }
    if let Some(raw) = args.get(5) {
        let contingency = raw
            .parse()
            .map_err(|_| format!("Invalid contingency margin '{raw}'"))?;
        task = task.with_contingency(contingency);
    }
    project.add_task(task).map_err(|e| e.to_string())
}

fn add_holidays(project: &mut Project, who: &str, text: &str) -> Result<usize, String> {
    let dates = try_parse_date_ranges(text).map_err(|bad| format!("Invalid date '{bad}'"))?;
    if who.eq_ignore_ascii_case("global") {
        for date in &dates {
            project.add_global_holiday_date(*date);
        }
    } else {
        let employee = project
            .employee_mut(who)
            .ok_or_else(|| format!("Employee '{who}' not found"))?;
        for date in &dates {
            employee.add_holiday_date(*date);
        }
    }
    Ok(dates.len())
}

fn main() {
    config::init_tracing();

    let mut project: Option<Project> = None;

    println!("Gantt Tool (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let parts: Vec<&str> = input.split_whitespace().collect();
        let cmd = parts[0];
        let args = &parts[1..];

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "project" => match args.split_first() {
                Some((date_s, name_parts)) => match parse_iso_date(date_s) {
                    Ok(start) => {
                        let name = if name_parts.is_empty() {
                            "Unnamed Project".to_string()
                        } else {
                            name_parts.join(" ")
                        };
                        println!("Project '{}' starts {}.", name, start);
                        project = Some(Project::new(name, start));
                    }
                    Err(_) => println!("Invalid date (YYYY-MM-DD)"),
                },
                None => println!("Usage: project <YYYY-MM-DD> [name...]"),
            },
            "employee" => {
                let current = match require_project(&mut project) {
                    Ok(p) => p,
                    Err(e) => {
                        println!("{}", e);
                        continue;
                    }
                };
                match args {
                    [name, rest @ ..] => {
                        let mut employee = Employee::new(*name);
                        if let Some(pattern_s) = rest.first() {
                            let result = parse_pattern(pattern_s)
                                .and_then(|p| employee.set_work_pattern(&p).map_err(|e| e.to_string()));
                            if let Err(e) = result {
                                println!("Error: {}", e);
                                continue;
                            }
                        }
                        let replaced = current.add_employee(employee).is_some();
                        if replaced {
                            println!("Employee '{}' replaced.", name);
                        } else {
                            println!("Employee '{}' added.", name);
                        }
                    }
                    [] => println!("Usage: employee <name> [pattern_csv]"),
                }
            }
            "pattern" => {
                let current = match require_project(&mut project) {
                    Ok(p) => p,
                    Err(e) => {
                        println!("{}", e);
                        continue;
                    }
                };
                match args {
                    [name, pattern_s] => {
                        let result = parse_pattern(pattern_s).and_then(|p| {
                            current
                                .employee_mut(name)
                                .ok_or_else(|| format!("Employee '{name}' not found"))?
                                .set_work_pattern(&p)
                                .map_err(|e| e.to_string())
                        });
                        match result {
                            Ok(()) => println!("Work pattern for '{}' set.", name),
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    _ => println!("Usage: pattern <name> <pattern_csv>"),
                }
            }
            "holiday" => {
                let current = match require_project(&mut project) {
                    Ok(p) => p,
                    Err(e) => {
                        println!("{}", e);
                        continue;
                    }
                };
                match args.split_first() {
                    Some((who, dates)) if !dates.is_empty() => {
                        match add_holidays(current, who, &dates.join(" ")) {
                            Ok(count) => println!("Added {} holiday(s) for {}.", count, who),
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    _ => println!("Usage: holiday <name|global> <dates...>"),
                }
            }
            "task" => {
                let current = match require_project(&mut project) {
                    Ok(p) => p,
                    Err(e) => {
                        println!("{}", e);
                        continue;
                    }
                };
                match add_task(current, args) {
                    Ok(()) => println!("Task '{}' added.", args[0]),
                    Err(e) => println!("Error: {}", e),
                }
            }
            "compute" => {
                let current = match require_project(&mut project) {
                    Ok(p) => p,
                    Err(e) => {
                        println!("{}", e);
                        continue;
                    }
                };
                match current.calculate_schedule() {
                    Ok(summary) => {
                        println!("Calculated ({})", summary.to_cli_summary());
                        print_table(summary_dataframe(current));
                    }
                    Err(e) => println!("Schedule error: {}", e),
                }
            }
            "show" | "gantt" | "range" => {
                let current = match require_project(&mut project) {
                    Ok(p) => p,
                    Err(e) => {
                        println!("{}", e);
                        continue;
                    }
                };
                match cmd {
                    "show" => print_table(summary_dataframe(current)),
                    "gantt" => print_table(gantt_dataframe(current)),
                    _ => {
                        let (start, end) = current.date_range();
                        println!("Project '{}': {} to {}", current.name(), start, end);
                    }
                }
            }
            "save" | "load" | "export" | "import" => {
                let (format, path) = match args {
                    [format, path] => (*format, *path),
                    _ => {
                        println!("Usage: {} <format> <path>", cmd);
                        continue;
                    }
                };
                match (cmd, format) {
                    ("load", "json") => match interchange::load_definition_from_json(path) {
                        Ok(loaded) => {
                            println!(
                                "Project '{}' loaded from {} ({} task(s)).",
                                loaded.name(),
                                path,
                                loaded.tasks().len()
                            );
                            project = Some(loaded);
                        }
                        Err(e) => println!("Load error: {}", e),
                    },
                    ("save", "json") | ("export", "csv") | ("import", "csv") => {
                        let current = match require_project(&mut project) {
                            Ok(p) => p,
                            Err(e) => {
                                println!("{}", e);
                                continue;
                            }
                        };
                        let result = match cmd {
                            "save" => interchange::save_definition_to_json(current, path)
                                .map(|_| format!("Project saved to {path}.")),
                            "export" => interchange::export_gantt_to_csv(current, path)
                                .map(|_| format!("Gantt table exported to {path}.")),
                            _ => interchange::import_tasks_from_csv(path).and_then(|tasks| {
                                let count = tasks.len();
                                for task in tasks {
                                    current.add_task(task)?;
                                }
                                Ok(format!("Imported {count} task(s) from {path}."))
                            }),
                        };
                        match result {
                            Ok(message) => println!("{}", message),
                            Err(e) => println!("Error: {}", e),
                        }
                    }
                    _ => println!("Unsupported: {} {}", cmd, format),
                }
            }
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}
