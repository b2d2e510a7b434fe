//! Static UBIGEO reference tables (INEI codes).
//!
//! Departments are complete. Provinces and districts are populated for
//! Lima, Callao and Arequipa only.

use super::{Department, District, Province};

const fn dep(code: &'static str, name: &'static str) -> Department {
    Department { code, name }
}

const fn prov(code: &'static str, name: &'static str, department_code: &'static str) -> Province {
    Province {
        code,
        name,
        department_code,
    }
}

const fn dist(
    code: &'static str,
    name: &'static str,
    province_code: &'static str,
    department_code: &'static str,
) -> District {
    District {
        code,
        name,
        province_code,
        department_code,
    }
}

pub(super) static DEPARTMENTS: [Department; 25] = [
    dep("01", "Amazonas"),
    dep("02", "Áncash"),
    dep("03", "Apurímac"),
    dep("04", "Arequipa"),
    dep("05", "Ayacucho"),
    dep("06", "Cajamarca"),
    dep("07", "Callao"),
    dep("08", "Cusco"),
    dep("09", "Huancavelica"),
    dep("10", "Huánuco"),
    dep("11", "Ica"),
    dep("12", "Junín"),
    dep("13", "La Libertad"),
    dep("14", "Lambayeque"),
    dep("15", "Lima"),
    dep("16", "Loreto"),
    dep("17", "Madre de Dios"),
    dep("18", "Moquegua"),
    dep("19", "Pasco"),
    dep("20", "Piura"),
    dep("21", "Puno"),
    dep("22", "San Martín"),
    dep("23", "Tacna"),
    dep("24", "Tumbes"),
    dep("25", "Ucayali"),
];

pub(super) static PROVINCES: [Province; 19] = [
    // Arequipa
    prov("0401", "Arequipa", "04"),
    prov("0402", "Camaná", "04"),
    prov("0403", "Caravelí", "04"),
    prov("0404", "Castilla", "04"),
    prov("0405", "Caylloma", "04"),
    prov("0406", "Condesuyos", "04"),
    prov("0407", "Islay", "04"),
    prov("0408", "La Unión", "04"),
    // Callao
    prov("0701", "Callao", "07"),
    // Lima
    prov("1501", "Lima", "15"),
    prov("1502", "Barranca", "15"),
    prov("1503", "Cajatambo", "15"),
    prov("1504", "Canta", "15"),
    prov("1505", "Cañete", "15"),
    prov("1506", "Huaral", "15"),
    prov("1507", "Huarochirí", "15"),
    prov("1508", "Huaura", "15"),
    prov("1509", "Oyón", "15"),
    prov("1510", "Yauyos", "15"),
];

pub(super) static DISTRICTS: [District; 79] = [
    // Arequipa / Arequipa
    dist("040101", "Arequipa", "0401", "04"),
    dist("040102", "Alto Selva Alegre", "0401", "04"),
    dist("040103", "Cayma", "0401", "04"),
    dist("040104", "Cerro Colorado", "0401", "04"),
    dist("040105", "Characato", "0401", "04"),
    dist("040106", "Chiguata", "0401", "04"),
    dist("040107", "Jacobo Hunter", "0401", "04"),
    dist("040108", "La Joya", "0401", "04"),
    dist("040109", "Mariano Melgar", "0401", "04"),
    dist("040110", "Miraflores", "0401", "04"),
    dist("040111", "Mollebaya", "0401", "04"),
    dist("040112", "Paucarpata", "0401", "04"),
    dist("040113", "Pocsi", "0401", "04"),
    dist("040114", "Polobaya", "0401", "04"),
    dist("040115", "Quequeña", "0401", "04"),
    dist("040116", "Sabandía", "0401", "04"),
    dist("040117", "Sachaca", "0401", "04"),
    dist("040118", "San Juan de Siguas", "0401", "04"),
    dist("040119", "San Juan de Tarucani", "0401", "04"),
    dist("040120", "Santa Isabel de Siguas", "0401", "04"),
    dist("040121", "Santa Rita de Siguas", "0401", "04"),
    dist("040122", "Socabaya", "0401", "04"),
    dist("040123", "Tiabaya", "0401", "04"),
    dist("040124", "Uchumayo", "0401", "04"),
    dist("040125", "Vítor", "0401", "04"),
    dist("040126", "Yanahuara", "0401", "04"),
    dist("040127", "Yarabamba", "0401", "04"),
    dist("040128", "Yura", "0401", "04"),
    dist("040129", "José Luis Bustamante y Rivero", "0401", "04"),
    // Callao / Callao
    dist("070101", "Callao", "0701", "07"),
    dist("070102", "Bellavista", "0701", "07"),
    dist("070103", "Carmen de la Legua Reynoso", "0701", "07"),
    dist("070104", "La Perla", "0701", "07"),
    dist("070105", "La Punta", "0701", "07"),
    dist("070106", "Ventanilla", "0701", "07"),
    dist("070107", "Mi Perú", "0701", "07"),
    // Lima / Lima
    dist("150101", "Lima", "1501", "15"),
    dist("150102", "Ancón", "1501", "15"),
    dist("150103", "Ate", "1501", "15"),
    dist("150104", "Barranco", "1501", "15"),
    dist("150105", "Breña", "1501", "15"),
    dist("150106", "Carabayllo", "1501", "15"),
    dist("150107", "Chaclacayo", "1501", "15"),
    dist("150108", "Chorrillos", "1501", "15"),
    dist("150109", "Cieneguilla", "1501", "15"),
    dist("150110", "Comas", "1501", "15"),
    dist("150111", "El Agustino", "1501", "15"),
    dist("150112", "Independencia", "1501", "15"),
    dist("150113", "Jesús María", "1501", "15"),
    dist("150114", "La Molina", "1501", "15"),
    dist("150115", "La Victoria", "1501", "15"),
    dist("150116", "Lince", "1501", "15"),
    dist("150117", "Los Olivos", "1501", "15"),
    dist("150118", "Lurigancho", "1501", "15"),
    dist("150119", "Lurín", "1501", "15"),
    dist("150120", "Magdalena del Mar", "1501", "15"),
    dist("150121", "Pueblo Libre", "1501", "15"),
    dist("150122", "Miraflores", "1501", "15"),
    dist("150123", "Pachacámac", "1501", "15"),
    dist("150124", "Pucusana", "1501", "15"),
    dist("150125", "Puente Piedra", "1501", "15"),
    dist("150126", "Punta Hermosa", "1501", "15"),
    dist("150127", "Punta Negra", "1501", "15"),
    dist("150128", "Rímac", "1501", "15"),
    dist("150129", "San Bartolo", "1501", "15"),
    dist("150130", "San Borja", "1501", "15"),
    dist("150131", "San Isidro", "1501", "15"),
    dist("150132", "San Juan de Lurigancho", "1501", "15"),
    dist("150133", "San Juan de Miraflores", "1501", "15"),
    dist("150134", "San Luis", "1501", "15"),
    dist("150135", "San Martín de Porres", "1501", "15"),
    dist("150136", "San Miguel", "1501", "15"),
    dist("150137", "Santa Anita", "1501", "15"),
    dist("150138", "Santa María del Mar", "1501", "15"),
    dist("150139", "Santa Rosa", "1501", "15"),
    dist("150140", "Santiago de Surco", "1501", "15"),
    dist("150141", "Surquillo", "1501", "15"),
    dist("150142", "Villa El Salvador", "1501", "15"),
    dist("150143", "Villa María del Triunfo", "1501", "15"),
];
