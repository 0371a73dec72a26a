//! Terrain elevation sampling.
//!
//! The elevation deriver only needs one capability: elevation in meters at a
//! (lon, lat) position, or absent when the position falls outside raster
//! coverage. [`GridTerrain`] realizes that over a regular lon/lat grid loaded
//! from an ESRI ASCII grid file, with bilinear interpolation between cell
//! centers.

use std::fs;
use std::path::Path;

use crate::Error;

/// "Elevation at point" capability consumed by the elevation deriver.
pub trait TerrainSampler: Sync {
    /// Elevation in meters at (lon, lat) degrees, or `None` outside coverage
    /// or over nodata cells.
    fn elevation_at(&self, lon: f64, lat: f64) -> Option<f64>;
}

/// Regular lon/lat elevation grid.
///
/// Values sit at cell centers; rows are stored north to south as in the
/// ESRI ASCII grid format. Sampling interpolates bilinearly between the four
/// surrounding centers and returns `None` when any of them is nodata or the
/// point falls outside the grid.
#[derive(Debug, Clone)]
pub struct GridTerrain {
    ncols: usize,
    nrows: usize,
    /// Lower-left (SW) corner of the grid extent, in degrees
    xll: f64,
    yll: f64,
    cell_size: f64,
    nodata: f64,
    /// Row-major, row 0 northernmost
    data: Vec<f64>,
}

impl GridTerrain {
    pub fn new(
        ncols: usize,
        nrows: usize,
        xll: f64,
        yll: f64,
        cell_size: f64,
        nodata: f64,
        data: Vec<f64>,
    ) -> Result<Self, Error> {
        if data.len() != ncols * nrows {
            return Err(Error::InvalidData(format!(
                "terrain grid expects {} values ({ncols}x{nrows}), got {}",
                ncols * nrows,
                data.len()
            )));
        }
        if ncols < 2 || nrows < 2 {
            return Err(Error::InvalidData(
                "terrain grid needs at least 2x2 cells".to_owned(),
            ));
        }
        Ok(Self {
            ncols,
            nrows,
            xll,
            yll,
            cell_size,
            nodata,
            data,
        })
    }

    /// Parse an ESRI ASCII grid (.asc) file: a six-line header
    /// (ncols, nrows, xllcorner, yllcorner, cellsize, NODATA_value) followed
    /// by whitespace-separated rows, northernmost row first.
    pub fn from_ascii_grid(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)?;
        let mut tokens = contents.split_whitespace();

        let mut header = |name: &str| -> Result<f64, Error> {
            let key = tokens
                .next()
                .ok_or_else(|| Error::InvalidData(format!("missing header key {name}")))?;
            if !key.eq_ignore_ascii_case(name) {
                return Err(Error::InvalidData(format!(
                    "expected header key {name}, found {key}"
                )));
            }
            let value = tokens
                .next()
                .ok_or_else(|| Error::InvalidData(format!("missing value for {name}")))?;
            value
                .parse()
                .map_err(|_| Error::InvalidData(format!("invalid value for {name}: {value}")))
        };

        let ncols = header("ncols")? as usize;
        let nrows = header("nrows")? as usize;
        let xll = header("xllcorner")?;
        let yll = header("yllcorner")?;
        let cell_size = header("cellsize")?;
        let nodata = header("NODATA_value")?;

        let data: Vec<f64> = tokens
            .map(|token| {
                token
                    .parse()
                    .map_err(|_| Error::InvalidData(format!("invalid elevation value: {token}")))
            })
            .collect::<Result<_, _>>()?;

        Self::new(ncols, nrows, xll, yll, cell_size, nodata, data)
    }

    fn value_at(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.nrows || col >= self.ncols {
            return None;
        }
        let v = self.data[row * self.ncols + col];
        if v == self.nodata { None } else { Some(v) }
    }

    fn sample(&self, lon: f64, lat: f64) -> Option<f64> {
        // Positions of cell centers: SW center is (xll + cell/2, yll + cell/2).
        let col_f = (lon - self.xll) / self.cell_size - 0.5;
        // Row 0 is the northern edge
        let north_center = self.yll + (self.nrows as f64 - 0.5) * self.cell_size;
        let row_f = (north_center - lat) / self.cell_size;

        if col_f < 0.0 || row_f < 0.0 {
            return None;
        }
        let col_f = col_f.min((self.ncols - 1) as f64);
        let row_f = row_f.min((self.nrows - 1) as f64);

        let col0 = (col_f.floor() as usize).min(self.ncols - 2);
        let row0 = (row_f.floor() as usize).min(self.nrows - 2);

        let v00 = self.value_at(row0, col0)?;
        let v01 = self.value_at(row0, col0 + 1)?;
        let v10 = self.value_at(row0 + 1, col0)?;
        let v11 = self.value_at(row0 + 1, col0 + 1)?;

        let dc = col_f - col0 as f64;
        let dr = row_f - row0 as f64;

        let top = v00 + (v01 - v00) * dc;
        let bottom = v10 + (v11 - v10) * dc;
        Some(top + (bottom - top) * dr)
    }

    /// Grid extent as (min_lon, min_lat, max_lon, max_lat).
    pub fn extent(&self) -> (f64, f64, f64, f64) {
        (
            self.xll,
            self.yll,
            self.xll + self.ncols as f64 * self.cell_size,
            self.yll + self.nrows as f64 * self.cell_size,
        )
    }
}

impl TerrainSampler for GridTerrain {
    fn elevation_at(&self, lon: f64, lat: f64) -> Option<f64> {
        let (min_lon, min_lat, max_lon, max_lat) = self.extent();
        if lon < min_lon || lon > max_lon || lat < min_lat || lat > max_lat {
            return None;
        }
        self.sample(lon, lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 3x3 grid over lon 0..3, lat 0..3, rising 10 m per column eastward.
    fn sloped_grid() -> GridTerrain {
        #[rustfmt::skip]
        let data = vec![
            100.0, 110.0, 120.0,
            100.0, 110.0, 120.0,
            100.0, 110.0, 120.0,
        ];
        GridTerrain::new(3, 3, 0.0, 0.0, 1.0, -9999.0, data).unwrap()
    }

    #[test]
    fn samples_exactly_at_cell_center() {
        let grid = sloped_grid();
        assert_eq!(grid.elevation_at(0.5, 1.5), Some(100.0));
        assert_eq!(grid.elevation_at(2.5, 1.5), Some(120.0));
    }

    #[test]
    fn interpolates_between_centers() {
        let grid = sloped_grid();
        let v = grid.elevation_at(1.0, 1.5).unwrap();
        assert!((v - 105.0).abs() < 1e-9, "got {v}");
    }

    #[test]
    fn outside_extent_is_absent() {
        let grid = sloped_grid();
        assert_eq!(grid.elevation_at(-0.5, 1.0), None);
        assert_eq!(grid.elevation_at(1.0, 5.0), None);
    }

    #[test]
    fn nodata_cell_is_absent() {
        // Nodata in the north-west corner cell
        let mut data = vec![100.0; 9];
        data[0] = -9999.0;
        let grid = GridTerrain::new(3, 3, 0.0, 0.0, 1.0, -9999.0, data).unwrap();
        assert_eq!(grid.elevation_at(0.5, 2.5), None);
        // The opposite corner is untouched
        assert_eq!(grid.elevation_at(2.5, 0.5), Some(100.0));
    }

    #[test]
    fn parses_ascii_grid() {
        let dir = std::env::temp_dir().join("velopath-terrain-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("grid.asc");
        std::fs::write(
            &path,
            "ncols 2\nnrows 2\nxllcorner -90.5\nyllcorner 38.5\ncellsize 0.25\nNODATA_value -9999\n\
             150 160\n140 150\n",
        )
        .unwrap();

        let grid = GridTerrain::from_ascii_grid(&path).unwrap();
        let (min_lon, min_lat, max_lon, max_lat) = grid.extent();
        assert_eq!((min_lon, min_lat), (-90.5, 38.5));
        assert_eq!((max_lon, max_lat), (-90.0, 39.0));
        assert_eq!(grid.elevation_at(-90.375, 38.625), Some(140.0));
    }

    #[test]
    fn rejects_wrong_cell_count() {
        assert!(GridTerrain::new(3, 3, 0.0, 0.0, 1.0, -9999.0, vec![1.0; 8]).is_err());
    }
}
