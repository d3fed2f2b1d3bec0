//! End-to-end exercise of the pure workflow pipeline: build a small attack
//! chain the way the UI would, fill in parameters, and check the exported
//! snapshot that bulk execution consumes.

use std::collections::HashMap;

use hackblock_frontend::models::CommandDescriptor;
use hackblock_frontend::workflow::WorkflowCanvas;

fn descriptor(name: &str, template: &str, options: Option<&[(&str, &str)]>) -> CommandDescriptor {
    CommandDescriptor {
        command_name: name.to_string(),
        description: format!("run {}", name),
        command_template: template.to_string(),
        available_options: options.map(|pairs| {
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>()
        }),
    }
}

#[test]
fn chain_of_blocks_exports_ready_to_run_commands() {
    let mut canvas = WorkflowCanvas::new();

    let scan = canvas.place(
        descriptor(
            "nmap",
            "nmap {options} {target}",
            Some(&[("-sV", "service detection"), ("-p-", "all ports")]),
        ),
        40.0,
        40.0,
    );
    let ssh = canvas.place(descriptor("ssh", "ssh {user}@{host} -p {port}", None), 340.0, 40.0);
    let cat = canvas.place(descriptor("cat", "cat {file}", None), 640.0, 40.0);

    canvas.auto_chain();
    assert_eq!(canvas.connections().len(), 2);
    assert!(canvas.contains_connection(scan, ssh));
    assert!(canvas.contains_connection(ssh, cat));

    canvas.set_parameter(scan, 0, "-sV".to_string());
    canvas.set_parameter(scan, 1, "10.0.0.1".to_string());
    canvas.set_parameter(ssh, 0, "bandit0".to_string());
    canvas.set_parameter(ssh, 1, "bandit.labs".to_string());
    canvas.set_parameter(ssh, 2, "2220".to_string());
    canvas.set_parameter(cat, 0, "readme".to_string());

    let snapshots = canvas.collect_all();
    let commands: Vec<&str> = snapshots.iter().map(|s| s.command.as_str()).collect();
    assert_eq!(
        commands,
        vec!["nmap -sV 10.0.0.1", "ssh bandit0@bandit.labs -p 2220", "cat readme"]
    );

    // snapshots carry everything an exporter needs
    assert_eq!(snapshots[0].name, "nmap");
    assert_eq!(snapshots[0].template, "nmap {options} {target}");
    assert_eq!(snapshots[0].parameter_values, vec!["-sV", "10.0.0.1"]);
    assert_eq!(snapshots[0].position.x, 40.0);
}

#[test]
fn deleting_the_middle_of_a_chain_and_rechaining_heals_it() {
    let mut canvas = WorkflowCanvas::new();
    let a = canvas.place(descriptor("a", "a", None), 0.0, 0.0);
    let b = canvas.place(descriptor("b", "b", None), 300.0, 0.0);
    let c = canvas.place(descriptor("c", "c", None), 600.0, 0.0);
    canvas.auto_chain();

    canvas.remove(b);
    canvas.auto_chain();

    assert_eq!(canvas.connections().len(), 1);
    assert!(canvas.contains_connection(a, c));
    assert!(canvas.collect_all().iter().all(|s| s.id != b));
}

#[test]
fn unset_parameters_leave_no_holes_in_the_command() {
    let mut canvas = WorkflowCanvas::new();
    let id = canvas.place(descriptor("scan", "scan {target} {options}", None), 0.0, 0.0);
    canvas.set_parameter(id, 0, "10.0.0.1".to_string());

    let snapshot = canvas.snapshot(id).unwrap().unwrap();
    assert_eq!(snapshot.command, "scan 10.0.0.1");
}
