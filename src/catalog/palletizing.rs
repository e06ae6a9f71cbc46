//! Palletizing line: conveyors, boxing, robot picker and pallet handling.

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
        line: ProductionLine::Palletizing,
        title: ProductionLine::Palletizing.title().to_string(),
        machines: vec![
            machine("conveyor1", "Belt Conveyor 1", "transport", Ok, &[("speed", 25.4), ("vibration", 0.08), ("power", 2.1), ("temp", 34.2), ("runtime", 340.0)]),
            machine("conveyor2", "Belt Conveyor 2", "transport", Ok, &[("speed", 24.8), ("vibration", 0.12), ("power", 2.3), ("temp", 36.1), ("runtime", 338.0)]),
            machine("infeed", "Product Infeed Station", "feeding", Ok, &[("speed", 25.0), ("throughput", 45.0), ("power", 1.2), ("temp", 45.2), ("efficiency", 94.5)]),
            machine("scanner1", "Barcode Scanner 1", "control", Ok, &[("readRate", 99.8), ("errors", 0.0), ("power", 0.3), ("temp", 28.5), ("scansPerMin", 42.0)]),
            machine("boxing", "Auto Boxing Unit", "packaging", Ok, &[("speed", 24.9), ("errors", 1.0), ("vibration", 0.12), ("power", 2.5), ("boxes", 1247.0)]),
            machine("weightCheck", "Weight Checker", "quality", Warning, &[("accuracy", 99.95), ("rejects", 2.0), ("power", 0.8), ("temp", 31.2), ("weightsPerMin", 48.0)]),
            machine("picking", "Robot Picker Arm", "robotics", Warning, &[("cycleTime", 3.1), ("errors", 3.0), ("motorCurrent", 5.8), ("pressure", 5.9), ("picks", 2840.0)]),
            machine("vision1", "Vision System 1", "quality", Ok, &[("accuracy", 99.9), ("fps", 30.0), ("power", 1.1), ("temp", 42.3), ("inspections", 3210.0)]),
            machine("palletizing", "Palletizing Robot", "robotics", Ok, &[("accuracy", 99.98), ("errors", 0.0), ("load", 85.0), ("power", 4.1), ("pallets", 124.0)]),
            machine("wrapping", "Pallet Wrapper", "packaging", Ok, &[("tension", 15.2), ("errors", 0.0), ("filmUsage", 98.7), ("power", 1.8), ("wraps", 98.0)]),
            machine("labeling", "Label Applicator", "packaging", Ok, &[("accuracy", 99.95), ("errors", 0.0), ("power", 0.9), ("temp", 29.8), ("labels", 1205.0)]),
            machine("outfeed", "Outfeed Conveyor", "transport", Ok, &[("throughput", 24.5), ("errors", 0.0), ("queue", 3.0), ("power", 0.8), ("pallets", 96.0)]),
            machine("plc1", "Main PLC Controller", "control", Ok, &[("cpuLoad", 23.4), ("memUsage", 45.2), ("power", 0.4), ("temp", 38.9), ("ioStatus", 100.0)]),
            machine("hmi1", "Operator HMI Panel", "control", Ok, &[("uptime", 99.9), ("power", 0.2), ("temp", 35.1), ("touch", 98.5), ("alerts", 0.0)]),
            machine("airComp", "Air Compressor", "utility", Ok, &[("pressure", 6.2), ("power", 12.4), ("temp", 68.3), ("flow", 85.2), ("hours", 2340.0)]),
            machine("chiller", "Cooling Unit", "utility", Ok, &[("tempOut", 15.2), ("power", 8.9), ("flow", 42.1), ("efficiency", 87.4), ("hours", 1980.0)]),
            machine("ups1", "UPS System 1", "power", Ok, &[("load", 67.8), ("battery", 100.0), ("power", 15.2), ("temp", 28.9), ("runtime", 480.0)]),
            machine("scanner2", "QR Scanner Exit", "control", Ok, &[("readRate", 99.7), ("errors", 1.0), ("power", 0.3), ("temp", 29.1), ("scansPerMin", 38.0)]),
            machine("safety1", "Safety Light Curtain", "safety", Ok, &[("status", 100.0), ("beam", 100.0), ("power", 0.1), ("temp", 26.8), ("triggers", 0.0)]),
            machine("motor1", "Main Drive Motor", "drive", Ok, &[("rpm", 1450.0), ("current", 15.4), ("power", 11.2), ("temp", 62.1), ("vibration", 0.15)]),
            machine("encoder1", "Position Encoder 1", "sensor", Ok, &[("resolution", 1024.0), ("accuracy", 99.99), ("power", 0.1), ("temp", 31.5), ("pulses", 98420.0)]),
            machine("press1", "Pressure Sensor 1", "sensor", Ok, &[("pressure", 5.8), ("accuracy", 99.9), ("power", 0.05), ("temp", 28.2), ("readings", 15680.0)]),
            machine("valve1", "Pneumatic Valve 1", "actuator", Ok, &[("cycles", 2840.0), ("pressure", 6.0), ("power", 0.2), ("temp", 35.4), ("response", 45.0)]),
            machine("servo1", "Servo Motor 1", "drive", Warning, &[("position", 180.5), ("torque", 85.2), ("power", 2.4), ("temp", 58.9), ("accuracy", 99.95)]),
            machine("inverter1", "VFD Controller 1", "drive", Ok, &[("frequency", 50.1), ("output", 380.0), ("power", 18.5), ("temp", 45.2), ("efficiency", 94.8)]),
            machine("router1", "Network Router", "network", Ok, &[("uptime", 99.95), ("packets", 45680.0), ("power", 0.8), ("temp", 42.1), ("connections", 24.0)]),
        ],
        records: vec![
            BatchRecord {
                id: "BATCH-P001".to_string(),
                model: "CS-XU9ZKH-8".to_string(),
                shift: 1,
                quantity: 40,
                status: STATUS_COMPLETED.to_string(),
                oee: 88.2,
                operator: "An Nguyễn".to_string(),
                start_time: Some("06:00".to_string()),
                end_time: Some("14:00".to_string()),
                ai_summary: "Lô sản xuất đạt hiệu suất tốt. Ghi nhận 1 lỗi nhỏ tại máy đóng thùng, không ảnh hưởng chất lượng.".to_string(),
                children: vec![
                    child("PALLET-001A", "Pallet 1A, 20 máy điều hòa", STATUS_COMPLETED, 850.0, "3.2h"),
                    child("PALLET-001B", "Pallet 1B, 20 máy điều hòa", STATUS_COMPLETED, 840.0, "3.1h"),
                ],
            },
            BatchRecord {
                id: "BATCH-P002".to_string(),
                model: "CS-U12ZKH-8".to_string(),
                shift: 2,
                quantity: 30,
                status: STATUS_IN_PROGRESS.to_string(),
                oee: 84.5,
                operator: "Bình Trần".to_string(),
                start_time: Some("14:00".to_string()),
                end_time: Some("22:00".to_string()),
                ai_summary: "Robot gắp đặt giảm 8% hiệu suất do thời gian chu kỳ tăng. Cần kiểm tra cơ cấu kẹp.".to_string(),
                children: vec![
                    child("PALLET-002A", "Pallet 2A, 15 máy điều hòa", STATUS_COMPLETED, 635.0, "2.8h"),
                    child("PALLET-002B", "Pallet 2B, 15 máy điều hòa", STATUS_IN_PROGRESS, 420.0, "1.9h"),
                ],
            },
            BatchRecord {
                id: "BATCH-P003".to_string(),
                model: "CS-Z18ZKH-8".to_string(),
                shift: 3,
                quantity: 35,
                status: STATUS_SCHEDULED.to_string(),
                oee: 0.0,
                operator: "Cường Vũ".to_string(),
                start_time: Some("22:00".to_string()),
                end_time: Some("06:00".to_string()),
                ai_summary: "Batch được lên lịch sản xuất ca đêm. Dự kiến hoàn thành trong 8 giờ.".to_string(),
                children: vec![
                    child("PALLET-003A", "Pallet 3A, 18 máy điều hòa", STATUS_WAITING, 0.0, "0h"),
                    child("PALLET-003B", "Pallet 3B, 17 máy điều hòa", STATUS_WAITING, 0.0, "0h"),
                ],
            },
        ],
        trend: vec![
            trend("00:00", 85.2, 92.1, 88.4, 95.8),
            trend("00:30", 85.8, 91.8, 89.1, 95.9),
            trend("01:00", 86.1, 92.5, 88.7, 96.2),
            trend("01:30", 85.9, 92.0, 89.3, 95.5),
            trend("02:00", 86.4, 92.8, 88.9, 96.1),
            trend("02:30", 85.7, 91.6, 89.5, 95.7),
            trend("03:00", 86.2, 92.4, 89.0, 96.0),
            trend("03:30", 85.8, 91.9, 89.2, 95.8),
            trend("04:00", 86.5, 92.6, 89.4, 96.3),
            trend("04:30", 85.9, 92.1, 88.8, 95.9),
            trend("05:00", 86.8, 93.1, 89.1, 96.5),
            trend("05:30", 86.3, 92.5, 89.7, 95.8),
            trend("06:00", 87.3, 93.4, 89.2, 96.7),
            trend("06:30", 87.1, 93.0, 89.8, 96.4),
            trend("07:00", 87.8, 93.7, 89.5, 96.9),
            trend("07:30", 87.5, 93.2, 90.1, 96.3),
            trend("08:00", 88.1, 94.0, 89.7, 97.1),
            trend("08:30", 87.9, 93.8, 90.3, 96.8),
            trend("09:00", 88.4, 94.2, 90.0, 97.3),
            trend("09:30", 87.7, 93.5, 90.5, 96.6),
            // Maintenance dip.
            trend("10:00", 84.5, 89.2, 91.2, 96.8),
            trend("10:30", 86.8, 92.4, 90.1, 96.4),
            trend("11:00", 87.6, 93.6, 89.9, 97.0),
        ],
        cases: vec![misaligned_pallets(), throughput_scheduling()],
    }
}

fn misaligned_pallets() -> CaseStudy {
    CaseStudy {
        id: "case-p01".to_string(),
        title: "Case Study: Giải quyết vấn đề lỗi xếp lệch pallet".to_string(),
        tags: strings(&["Robot", "Calibration", "Quality"]),
        severity: "Medium".to_string(),
        impact: "Quality".to_string(),
        problem: "Dây chuyền Palletizing ghi nhận tỷ lệ lỗi xếp pallet tăng 5% trong 3 ngày qua, gây mất ổn định pallet và phải làm lại bằng tay, ảnh hưởng nghiêm trọng đến chỉ số Quality và Availability.".to_string(),
        symptoms: Some(strings(&[
            "Sản phẩm không được xếp đúng vị trí trên pallet",
            "Pallet bị nghiêng, mất cân bằng",
            "Tăng thời gian xử lý thủ công",
            "Alarm từ vision system về độ lệch vị trí",
        ])),
        analysis: CaseAnalysis {
            title: "Phân tích sâu của AI System".to_string(),
            methodology: Some("Sử dụng Machine Learning để phân tích pattern dữ liệu từ 15 sensors trong 72 giờ".to_string()),
            findings: strings(&[
                "AI phát hiện sự trôi điểm zero (zero-point drift) của trục Z trên robot palletizing",
                "Biểu đồ nhiệt độ cho thấy nhiệt độ motor servo tăng 8°C so với baseline",
                "Correlation analysis cho thấy độ lệch tăng dần tuyến tính theo thời gian hoạt động",
                "Vibration sensor ghi nhận frequency spike tại 45Hz (bearing wear indicator)",
                "Vision system xác nhận độ lệch vượt ngưỡng tolerance 0.5mm sau 3h hoạt động liên tục",
            ]),
            root_cause: Some("Thermal expansion của mechanical components kết hợp với wear của precision bearing".to_string()),
        },
        solution: CaseSolution {
            title: "Giải pháp tối ưu & Implementation".to_string(),
            immediate_action: "Thực hiện re-calibration điểm zero cho robot theo ISO 9283 standard".to_string(),
            preventive_action: Some(strings(&[
                "Cài đặt automatic thermal compensation algorithm",
                "Lên lịch preventive calibration mỗi 500 operating hours",
                "Upgrade cooling system cho servo motors",
                "Implement real-time drift monitoring với automatic adjustment",
            ])),
            implementation: Some(Implementation {
                duration: "45 phút downtime cho emergency calibration".to_string(),
                resources: "Maintenance team + Robot technician".to_string(),
                cost: "Minimal - sử dụng existing calibration tools".to_string(),
            }),
            outcome: "Tỷ lệ lỗi giảm từ 5% về 0.1%. Quality index phục hồi 100%. ROI achieved trong 2 shifts.".to_string(),
            oee_impact: OeeImpact {
                before: 82.1,
                after: 87.5,
                improvement: Some("+5.4%".to_string()),
            },
        },
        lessons: Some(strings(&[
            "Thermal effects cần được monitor continuously trong precision applications",
            "Predictive maintenance algorithms có thể prevent 90% similar issues",
            "Investment trong advanced cooling systems có ROI cao cho high-precision robotics",
        ])),
        attachments: Some(strings(&[
            "Calibration_Protocol_v2.1.pdf",
            "Thermal_Analysis_Report.xlsx",
            "Before_After_Comparison.mp4",
        ])),
    }
}

fn throughput_scheduling() -> CaseStudy {
    CaseStudy {
        id: "case-p02".to_string(),
        title: "Case Study: Tối ưu hóa throughput với AI-driven scheduling".to_string(),
        tags: strings(&["AI", "Optimization", "Throughput"]),
        severity: "Low".to_string(),
        impact: "Efficiency".to_string(),
        problem: "Throughput của dây chuyền đạt chỉ 85% so với thiết kế, với bottleneck không rõ ràng. Management yêu cầu tăng output 15% mà không đầu tư thêm equipment.".to_string(),
        symptoms: Some(strings(&[
            "Random delays không giải thích được",
            "Machine utilization không đồng đều",
            "Buffer zones thường xuyên overflow hoặc starved",
            "OEE fluctuation không có pattern rõ ràng",
        ])),
        analysis: CaseAnalysis {
            title: "AI-Powered Bottleneck Analysis".to_string(),
            methodology: Some("Deep learning analysis trên 30 ngày production data với 200+ variables".to_string()),
            findings: strings(&[
                "Hidden bottleneck tại conveyor transition points do non-optimal speed matching",
                "Batching strategy không tối ưu - mixing fast/slow products gây blocking",
                "Preventive maintenance schedule conflicts với peak production windows",
                "Operator break timing tạo ra cascading delays",
                "Material feeding rhythm không sync với machine capacity",
            ]),
            root_cause: Some("Lack of holistic system optimization - mỗi machine được tune riêng lẻ".to_string()),
        },
        solution: CaseSolution {
            title: "AI-Driven Dynamic Optimization System".to_string(),
            immediate_action: "Deploy real-time scheduling algorithm với predictive modeling".to_string(),
            preventive_action: Some(strings(&[
                "Implement machine learning-based speed coordination",
                "Dynamic batching based on real-time system state",
                "Intelligent maintenance scheduling với production forecast",
                "Automated material feeding với demand prediction",
            ])),
            implementation: Some(Implementation {
                duration: "1 tuần implementation + 2 tuần fine-tuning".to_string(),
                resources: "AI team + Process engineers + IT support".to_string(),
                cost: "Software development cost only - no hardware changes".to_string(),
            }),
            outcome: "Throughput increase 18.5% (vượt target). Machine utilization cân bằng 95%+. Energy efficiency tăng 12%.".to_string(),
            oee_impact: OeeImpact {
                before: 85.2,
                after: 91.8,
                improvement: Some("+6.6%".to_string()),
            },
        },
        lessons: Some(strings(&[
            "System-level optimization >>> individual machine optimization",
            "AI có thể find non-obvious patterns trong complex manufacturing systems",
            "Real-time adaptive control superior to static optimization",
        ])),
        attachments: Some(strings(&[
            "AI_Algorithm_Specification.pdf",
            "Before_After_Metrics.xlsx",
            "System_Architecture.png",
        ])),
    }
}
