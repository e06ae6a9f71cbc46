//! Robot welding line: loaders, welders, torches, gas supply and cooling.

use super::model::{
    BatchRecord, CaseAnalysis, CaseSolution, CaseStudy, Implementation, LineBundle, OeeImpact,
    ProductionLine, STATUS_COMPLETED, STATUS_IN_PROGRESS, STATUS_SCHEDULED, STATUS_WAITING,
    StatusLevel::{Ok, Warning},
};
use super::{child, machine, strings, trend};

// One machine per row.
#[rustfmt::skip]
pub(super) fn bundle() -> LineBundle {
    LineBundle {
        line: ProductionLine::Welding,
        title: ProductionLine::Welding.title().to_string(),
        machines: vec![
            machine("loader1", "Auto Part Loader", "loading", Ok, &[("cycleTime", 5.1), ("accuracy", 99.9), ("power", 1.5), ("parts", 820.0), ("temp", 38.5)]),
            machine("fixture1", "Welding Fixture 1", "fixture", Ok, &[("clampForce", 1250.0), ("accuracy", 99.95), ("power", 0.8), ("cycles", 815.0), ("temp", 42.1)]),
            machine("welder1", "Welding Robot 1", "welding", Ok, &[("voltage", 24.1), ("current", 180.0), ("gasFlow", 15.2), ("wireSpeed", 7.5), ("power", 6.8)]),
            machine("welder2", "Welding Robot 2", "welding", Warning, &[("voltage", 23.8), ("current", 175.0), ("gasFlow", 14.8), ("wireSpeed", 7.5), ("power", 6.5)]),
            machine("torch1", "Welding Torch 1", "tool", Ok, &[("temp", 280.0), ("gasFlow", 15.2), ("wireUsage", 85.4), ("power", 0.2), ("arc", 98.9)]),
            machine("torch2", "Welding Torch 2", "tool", Warning, &[("temp", 295.0), ("gasFlow", 14.5), ("wireUsage", 87.2), ("power", 0.2), ("arc", 96.8)]),
            machine("vision2", "Weld Vision System", "quality", Ok, &[("passRate", 99.8), ("defects", 1.0), ("processTime", 1.2), ("power", 0.5), ("inspections", 810.0)]),
            machine("seamer", "Seam Tracker", "guidance", Ok, &[("accuracy", 99.92), ("tracking", 100.0), ("power", 0.4), ("temp", 35.8), ("tracks", 1620.0)]),
            machine("cooling", "Cooling Station", "cooling", Ok, &[("tempIn", 180.0), ("tempOut", 40.0), ("time", 60.0), ("power", 3.1), ("flow", 28.5)]),
            machine("gasSupply", "Shielding Gas Supply", "supply", Ok, &[("pressure", 2.8), ("flow", 15.0), ("purity", 99.98), ("power", 0.3), ("volume", 850.0)]),
            machine("wireFeeder", "Wire Feeder Unit", "supply", Ok, &[("speed", 7.5), ("tension", 35.0), ("power", 0.6), ("temp", 32.1), ("wire", 92.5)]),
            machine("unloader", "Part Unloader", "unloading", Ok, &[("cycleTime", 4.5), ("errors", 0.0), ("power", 1.1), ("parts", 800.0), ("temp", 36.2)]),
            machine("positioner", "Welding Positioner", "positioning", Ok, &[("rotation", 45.5), ("tilt", 15.2), ("power", 2.8), ("accuracy", 99.9), ("cycles", 405.0)]),
            machine("exhaust", "Fume Extractor", "ventilation", Ok, &[("airflow", 850.0), ("power", 4.2), ("filter", 85.2), ("temp", 28.9), ("hours", 2150.0)]),
            machine("plc2", "Welding PLC", "control", Ok, &[("cpuLoad", 28.5), ("memUsage", 52.1), ("power", 0.4), ("temp", 41.2), ("ioStatus", 100.0)]),
            machine("powerSource1", "Welding Power Source 1", "power", Ok, &[("voltage", 24.0), ("current", 180.0), ("power", 4.32), ("efficiency", 88.5), ("temp", 65.2)]),
            machine("powerSource2", "Welding Power Source 2", "power", Warning, &[("voltage", 23.5), ("current", 175.0), ("power", 4.11), ("efficiency", 86.8), ("temp", 68.1)]),
            machine("transformer", "Step-down Transformer", "power", Ok, &[("inputV", 480.0), ("outputV", 24.0), ("power", 15.8), ("efficiency", 94.2), ("temp", 58.9)]),
            machine("chiller2", "Torch Cooling Unit", "cooling", Ok, &[("tempOut", 18.5), ("flow", 12.5), ("power", 2.4), ("efficiency", 91.2), ("temp", 25.8)]),
            machine("regulator", "Gas Pressure Regulator", "control", Ok, &[("pressureIn", 8.5), ("pressureOut", 2.8), ("flow", 15.0), ("accuracy", 99.8), ("temp", 24.5)]),
            machine("flowmeter", "Gas Flow Meter", "sensor", Ok, &[("flow", 15.0), ("accuracy", 99.9), ("power", 0.1), ("temp", 26.3), ("readings", 24580.0)]),
            machine("groundClamp", "Ground Clamp Assembly", "grounding", Ok, &[("resistance", 0.02), ("contact", 100.0), ("power", 0.0), ("temp", 28.1), ("connections", 815.0)]),
            machine("arcStarter", "Arc Starting Unit", "ignition", Ok, &[("voltage", 6000.0), ("success", 99.5), ("power", 0.8), ("temp", 45.8), ("starts", 1630.0)]),
            machine("wireGuide", "Wire Guide System", "guidance", Ok, &[("alignment", 99.9), ("wear", 15.2), ("power", 0.1), ("temp", 31.5), ("guides", 3260.0)]),
            machine("preheater", "Part Preheater", "heating", Ok, &[("temp", 120.0), ("power", 8.5), ("efficiency", 92.8), ("cycles", 200.0), ("time", 180.0)]),
        ],
        records: vec![
            BatchRecord {
                id: "BATCH-W001".to_string(),
                model: "FRAME-A1-DLX".to_string(),
                shift: 1,
                quantity: 120,
                status: STATUS_COMPLETED.to_string(),
                oee: 90.1,
                operator: "Văn Dũng".to_string(),
                start_time: Some("06:00".to_string()),
                end_time: Some("14:00".to_string()),
                ai_summary: "Lô hàng hoàn thành với chất lượng cao. Ghi nhận dòng hàn ổn định suốt ca.".to_string(),
                children: vec![
                    child("RACK-W01A", "Giá 1A, 60 khung chassis", STATUS_COMPLETED, 1800.0, "4.1h"),
                    child("RACK-W01B", "Giá 1B, 60 khung chassis", STATUS_COMPLETED, 1850.0, "3.9h"),
                ],
            },
            BatchRecord {
                id: "BATCH-W002".to_string(),
                model: "FRAME-B2-STD".to_string(),
                shift: 2,
                quantity: 150,
                status: STATUS_IN_PROGRESS.to_string(),
                oee: 86.7,
                operator: "Hải Sơn".to_string(),
                start_time: Some("14:00".to_string()),
                end_time: Some("22:00".to_string()),
                ai_summary: "Phát hiện dòng khí bảo vệ tại Robot 2 giảm nhẹ, có thể ảnh hưởng chất lượng mối hàn.".to_string(),
                children: vec![
                    child("RACK-W02A", "Giá 2A, 75 khung chassis", STATUS_COMPLETED, 2250.0, "3.8h"),
                    child("RACK-W02B", "Giá 2B, 75 khung chassis", STATUS_IN_PROGRESS, 1580.0, "2.1h"),
                ],
            },
            BatchRecord {
                id: "BATCH-W003".to_string(),
                model: "FRAME-C3-PRO".to_string(),
                shift: 3,
                quantity: 100,
                status: STATUS_SCHEDULED.to_string(),
                oee: 0.0,
                operator: "Long Hoàng".to_string(),
                start_time: Some("22:00".to_string()),
                end_time: Some("06:00".to_string()),
                ai_summary: "Batch sản xuất khung cao cấp, yêu cầu đặc biệt về chất lượng hàn.".to_string(),
                children: vec![
                    child("RACK-W03A", "Giá 3A, 50 khung chassis", STATUS_WAITING, 0.0, "0h"),
                    child("RACK-W03B", "Giá 3B, 50 khung chassis", STATUS_WAITING, 0.0, "0h"),
                ],
            },
        ],
        trend: vec![
            trend("00:00", 88.5, 94.2, 89.1, 95.8),
            trend("00:30", 89.1, 94.8, 89.4, 96.2),
            trend("01:00", 89.2, 94.5, 90.1, 95.9),
            trend("01:30", 88.8, 94.1, 89.7, 96.4),
            trend("02:00", 89.5, 95.0, 89.8, 96.1),
            trend("02:30", 89.3, 94.7, 90.2, 95.7),
            trend("03:00", 90.1, 95.4, 90.0, 96.8),
            trend("03:30", 89.8, 95.1, 90.4, 96.3),
            trend("04:00", 90.4, 95.7, 90.1, 97.0),
            trend("04:30", 90.0, 95.3, 90.6, 96.5),
            trend("05:00", 90.7, 96.0, 90.3, 97.2),
            trend("05:30", 90.2, 95.5, 90.8, 96.7),
            trend("06:00", 89.5, 94.8, 90.5, 96.4),
            trend("06:30", 89.8, 95.2, 90.2, 96.9),
            trend("07:00", 90.3, 95.6, 90.7, 96.6),
            trend("07:30", 89.9, 95.0, 91.0, 96.8),
            // Gas flow issue.
            trend("08:00", 87.2, 91.8, 91.3, 96.1),
            trend("08:30", 88.6, 93.5, 90.9, 96.5),
            trend("09:00", 89.4, 94.7, 90.6, 96.8),
            trend("09:30", 89.1, 94.3, 91.1, 96.4),
            trend("10:00", 86.7, 92.1, 90.8, 95.8),
            trend("10:30", 88.2, 93.8, 90.5, 96.2),
            trend("11:00", 89.0, 94.5, 90.3, 96.7),
        ],
        cases: vec![weld_porosity()],
    }
}

fn weld_porosity() -> CaseStudy {
    CaseStudy {
        id: "case-w01".to_string(),
        title: "Case Study: Khắc phục lỗi mối hàn bị rỗ khí (porosity)".to_string(),
        tags: strings(&["Welding", "Gas Flow", "Quality"]),
        severity: "High".to_string(),
        impact: "Quality".to_string(),
        problem: "Tỷ lệ lỗi rỗ khí trên sản phẩm FRAME-B2 tăng đột biến lên 8% trong 48h, gây phải sửa chữa thủ công hàng loạt và risk recall products đã ship.".to_string(),
        symptoms: Some(strings(&[
            "Visual inspection phát hiện tiny holes trong weld beads",
            "X-ray testing confirm internal voids",
            "Strength testing giảm 15% so với specification",
            "Customer quality audit ghi nhận non-conformance",
        ])),
        analysis: CaseAnalysis {
            title: "Root Cause Analysis với Multi-sensor Fusion".to_string(),
            methodology: Some("Combine data từ gas flow sensors, pressure monitors, vision systems và spectrographic analysis".to_string()),
            findings: strings(&[
                "AI phát hiện sự sụt giảm bất thường của lưu lượng khí bảo vệ (gas flow) tại Robot 2, correlation 0.94 với thời điểm lỗi xuất hiện",
                "Pressure sensor data cho thấy micro-leakage pattern với cyclic behavior",
                "Spectrographic analysis confirm elevated oxygen content trong shielding gas",
                "Thermal imaging reveals hot spots tại flexible hose connections",
                "Statistical analysis pinpoint exact location: flexible coupling near torch assembly",
            ]),
            root_cause: Some("Deterioration của O-ring seals trong flexible gas coupling do thermal cycling fatigue".to_string()),
        },
        solution: CaseSolution {
            title: "Comprehensive Fix & Prevention Strategy".to_string(),
            immediate_action: "Emergency replacement của gas hose assembly với improved high-temp seals".to_string(),
            preventive_action: Some(strings(&[
                "Upgrade to premium VITON seals rated cho high-temperature cycling",
                "Install redundant pressure monitoring với alarm thresholds",
                "Implement automated leak detection system",
                "Schedule preventive replacement every 2000 operating hours",
                "Add torch cooling enhancement để reduce thermal stress",
            ])),
            implementation: Some(Implementation {
                duration: "4 giờ emergency maintenance + 1 shift testing".to_string(),
                resources: "Welding specialists + Quality team + Gas supplier support".to_string(),
                cost: "$1,200 cho premium components vs $45,000 potential recall cost".to_string(),
            }),
            outcome: "Porosity rate giảm từ 8% về <0.1%. Customer audit passed. Strength specs exceeded by 5%.".to_string(),
            oee_impact: OeeImpact {
                before: 81.4,
                after: 88.9,
                improvement: Some("+7.5%".to_string()),
            },
        },
        lessons: Some(strings(&[
            "Proactive seal maintenance critical trong high-thermal-cycling applications",
            "Multi-sensor fusion enables precise fault localization",
            "Premium components có lower total cost of ownership",
            "Real-time monitoring prevents quality disasters",
        ])),
        attachments: Some(strings(&[
            "Leak_Detection_Protocol.pdf",
            "Seal_Upgrade_Specification.pdf",
            "Quality_Recovery_Report.pdf",
        ])),
    }
}
